//! Radial gauge display configuration types

use serde::{Deserialize, Serialize};

use crate::color::{CustomSectors, Rgb};
use crate::easing::EasingKind;
use crate::gauge::{GaugeMode, GaugeState};

/// Reasons a gauge configuration is rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("min value ({min}) must be less than max value ({max})")]
    InvalidRange { min: f64, max: f64 },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("gauge width scale must be positive, got {0}")]
    InvalidWidthScale(f64),
    #[error("container size must be positive, got {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}

/// Needle dimensions and style. Unset lengths are derived from the widget width.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointerOptions {
    #[serde(default)]
    pub top_length: Option<f64>,
    #[serde(default)]
    pub bottom_length: Option<f64>,
    #[serde(default)]
    pub bottom_width: Option<f64>,
    #[serde(default = "default_pointer_color")]
    pub color: Rgb,
    #[serde(default)]
    pub stroke: Option<Rgb>,
    #[serde(default)]
    pub stroke_width: f64,
}

fn default_pointer_color() -> Rgb {
    Rgb::BLACK
}

impl Default for PointerOptions {
    fn default() -> Self {
        Self {
            top_length: None,
            bottom_length: None,
            bottom_width: None,
            color: default_pointer_color(),
            stroke: None,
            stroke_width: 0.0,
        }
    }
}

/// Radial gauge configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GaugeConfig {
    // Container
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,

    // Value range
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    #[serde(default)]
    pub reverse: bool,

    // Silhouette. `mode` wins over the legacy `donut` / `differential` flags.
    #[serde(default)]
    pub mode: Option<GaugeMode>,
    #[serde(default)]
    pub donut: bool,
    #[serde(default)]
    pub differential: bool,
    #[serde(default = "default_donut_start_angle")]
    pub donut_start_angle: f64, // Degrees
    #[serde(default = "default_gauge_width_scale")]
    pub gauge_width_scale: f64,

    // Colors
    #[serde(default = "default_gauge_color")]
    pub gauge_color: Rgb,
    #[serde(default = "default_level_colors")]
    pub level_colors: Vec<Rgb>,
    #[serde(default)]
    pub no_gradient: bool,
    #[serde(default)]
    pub custom_sectors: CustomSectors,

    // Inner shadow on the background and level
    #[serde(default)]
    pub show_inner_shadow: bool,
    #[serde(default = "default_shadow_opacity")]
    pub shadow_opacity: f64,
    #[serde(default = "default_shadow_size")]
    pub shadow_size: f64,
    #[serde(default = "default_shadow_vertical_offset")]
    pub shadow_vertical_offset: f64,

    // Animation
    #[serde(default = "default_animation_time")]
    pub start_animation_time: f64, // Milliseconds
    #[serde(default = "default_animation_type")]
    pub start_animation_type: EasingKind,
    #[serde(default = "default_animation_time")]
    pub refresh_animation_time: f64, // Milliseconds
    #[serde(default = "default_animation_type")]
    pub refresh_animation_type: EasingKind,
    #[serde(default)]
    pub counter: bool,

    // Pointer and target line
    #[serde(default)]
    pub pointer: bool,
    #[serde(default)]
    pub pointer_options: PointerOptions,
    #[serde(default)]
    pub target_line: Option<f64>,
    #[serde(default = "default_target_line_color")]
    pub target_line_color: Rgb,
    #[serde(default = "default_target_line_width")]
    pub target_line_width: f64,

    // Value text
    #[serde(default)]
    pub decimals: usize,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub human_friendly: bool,
    #[serde(default)]
    pub human_friendly_decimal: usize,
    #[serde(default)]
    pub format_number: bool,
    #[serde(default)]
    pub display_remaining: bool,
    #[serde(default)]
    pub hide_value: bool,
    #[serde(default = "default_value_font_color")]
    pub value_font_color: Rgb,
    #[serde(default = "default_font_family")]
    pub value_font_family: String,
    #[serde(default = "default_value_font_weight")]
    pub value_font_weight: String,
    #[serde(default = "default_value_min_font_size")]
    pub value_min_font_size: f64,

    // Labels
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub min_txt: Option<String>,
    #[serde(default)]
    pub max_txt: Option<String>,
    #[serde(default)]
    pub hide_min_max: bool,
    #[serde(default = "default_true")]
    pub show_min_max: bool,
    #[serde(default = "default_label_font_color")]
    pub label_font_color: Rgb,
    #[serde(default = "default_font_family")]
    pub label_font_family: String,
    #[serde(default = "default_font_weight")]
    pub label_font_weight: String,
    #[serde(default = "default_label_min_font_size")]
    pub label_min_font_size: f64,
    #[serde(default = "default_title_font_color")]
    pub title_font_color: Rgb,
    #[serde(default = "default_font_family")]
    pub title_font_family: String,
    #[serde(default = "default_font_weight")]
    pub title_font_weight: String,
}

fn default_width() -> f64 {
    400.0
}

fn default_height() -> f64 {
    320.0
}

fn default_max() -> f64 {
    100.0
}

fn default_donut_start_angle() -> f64 {
    90.0
}

fn default_gauge_width_scale() -> f64 {
    1.0
}

fn default_gauge_color() -> Rgb {
    Rgb::new(0xed, 0xeb, 0xeb)
}

/// Green, yellow, red
pub fn default_level_colors() -> Vec<Rgb> {
    vec![
        Rgb::new(0xa9, 0xd7, 0x0b),
        Rgb::new(0xf9, 0xc8, 0x02),
        Rgb::new(0xff, 0x00, 0x00),
    ]
}

fn default_shadow_opacity() -> f64 {
    0.2
}

fn default_shadow_size() -> f64 {
    5.0
}

fn default_shadow_vertical_offset() -> f64 {
    3.0
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

/// The value readout is drawn bold unless configured otherwise
fn default_value_font_weight() -> String {
    "bold".to_string()
}

fn default_animation_time() -> f64 {
    700.0
}

fn default_animation_type() -> EasingKind {
    EasingKind::EaseOut
}

fn default_target_line_color() -> Rgb {
    Rgb::BLACK
}

fn default_target_line_width() -> f64 {
    1.5
}

fn default_value_font_color() -> Rgb {
    Rgb::new(0x01, 0x01, 0x01)
}

fn default_value_min_font_size() -> f64 {
    16.0
}

fn default_true() -> bool {
    true
}

fn default_label_font_color() -> Rgb {
    Rgb::new(0xb3, 0xb3, 0xb3)
}

fn default_label_min_font_size() -> f64 {
    10.0
}

fn default_title_font_color() -> Rgb {
    Rgb::new(0x99, 0x99, 0x99)
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            value: 0.0,
            min: 0.0,
            max: default_max(),
            reverse: false,
            mode: None,
            donut: false,
            differential: false,
            donut_start_angle: default_donut_start_angle(),
            gauge_width_scale: default_gauge_width_scale(),
            gauge_color: default_gauge_color(),
            level_colors: default_level_colors(),
            no_gradient: false,
            custom_sectors: CustomSectors::default(),
            show_inner_shadow: false,
            shadow_opacity: default_shadow_opacity(),
            shadow_size: default_shadow_size(),
            shadow_vertical_offset: default_shadow_vertical_offset(),
            start_animation_time: default_animation_time(),
            start_animation_type: default_animation_type(),
            refresh_animation_time: default_animation_time(),
            refresh_animation_type: default_animation_type(),
            counter: false,
            pointer: false,
            pointer_options: PointerOptions::default(),
            target_line: None,
            target_line_color: default_target_line_color(),
            target_line_width: default_target_line_width(),
            decimals: 0,
            symbol: String::new(),
            human_friendly: false,
            human_friendly_decimal: 0,
            format_number: false,
            display_remaining: false,
            hide_value: false,
            value_font_color: default_value_font_color(),
            value_font_family: default_font_family(),
            value_font_weight: default_value_font_weight(),
            value_min_font_size: default_value_min_font_size(),
            label: String::new(),
            title: String::new(),
            min_txt: None,
            max_txt: None,
            hide_min_max: false,
            show_min_max: default_true(),
            label_font_color: default_label_font_color(),
            label_font_family: default_font_family(),
            label_font_weight: default_font_weight(),
            label_min_font_size: default_label_min_font_size(),
            title_font_color: default_title_font_color(),
            title_font_family: default_font_family(),
            title_font_weight: default_font_weight(),
        }
    }
}

impl GaugeConfig {
    /// Effective silhouette. The donut flag is checked before the differential flag.
    pub fn mode(&self) -> GaugeMode {
        match self.mode {
            Some(mode) => mode,
            None if self.donut => GaugeMode::Donut,
            None if self.differential => GaugeMode::Differential,
            None => GaugeMode::Standard,
        }
    }

    /// Check the configuration and normalize what can be normalized.
    ///
    /// The value is clamped into the range and an empty level palette is
    /// replaced by the defaults. Large width scales are accepted as-is.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        for (field, v) in [("value", self.value), ("min", self.min), ("max", self.max)] {
            if !v.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        if self.min >= self.max {
            return Err(ConfigError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        if !(self.gauge_width_scale > 0.0) {
            return Err(ConfigError::InvalidWidthScale(self.gauge_width_scale));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }

        self.value = self.value.clamp(self.min, self.max);

        if self.level_colors.is_empty() {
            log::warn!("Empty level colors, using default palette");
            self.level_colors = default_level_colors();
        }

        Ok(self)
    }

    pub fn state(&self) -> GaugeState {
        GaugeState::from_config(self)
    }
}

impl GaugeState {
    pub fn from_config(config: &GaugeConfig) -> Self {
        Self {
            value: config.value,
            min: config.min,
            max: config.max,
            reverse: config.reverse,
            mode: config.mode(),
            width_scale: config.gauge_width_scale,
        }
    }
}
