//! Gauge mode, runtime state and resolved geometry

use serde::{Deserialize, Serialize};

/// Gauge silhouette
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum GaugeMode {
    #[serde(rename = "standard")]
    #[default]
    Standard, // Half circle, fills left to right
    #[serde(rename = "donut")]
    Donut, // Full ring
    #[serde(rename = "differential")]
    Differential, // Half circle, grows out from the top center
}

impl GaugeMode {
    pub fn is_donut(self) -> bool {
        self == GaugeMode::Donut
    }
}

/// Value state of a single gauge, owned by the displayer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GaugeState {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub reverse: bool,
    pub mode: GaugeMode,
    pub width_scale: f64,
}

impl GaugeState {
    /// `(value - min) / (max - min)`, clamped to 0.0..=1.0
    pub fn ratio(&self) -> f64 {
        ratio_of(self.value, self.min, self.max)
    }

    /// Value mirrored about the range midpoint when the gauge is reversed
    pub fn display_value(&self, value: f64) -> f64 {
        if self.reverse {
            self.max + self.min - value
        } else {
            value
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Ratio of `value` within `[min, max]`, clamped to 0.0..=1.0
pub fn ratio_of(value: f64, min: f64, max: f64) -> f64 {
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Widget box, center and radii resolved from the container size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Geometry {
    pub widget_width: f64,
    pub widget_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl Geometry {
    /// Radial thickness of the gauge band
    pub fn band_width(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Center of the widget box (the donut rotation pivot)
    pub fn box_center(&self) -> (f64, f64) {
        (
            self.offset_x + self.widget_width / 2.0,
            self.offset_y + self.widget_height / 2.0,
        )
    }
}
