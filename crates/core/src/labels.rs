//! Text placement around the gauge

use rg_gauge_types::{GaugeConfig, Geometry};

use crate::constants::{BAND_WIDTH_DIVISOR, HALF_CIRCLE_MARGIN_DIVISOR};

/// Anchor point (horizontally centered, baseline) and font size of one text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

impl TextPlacement {
    fn new(x: f64, y: f64, font_size: f64) -> Self {
        Self { x, y, font_size }
    }
}

/// Where every text element of a gauge goes.
///
/// `min` and `max` hold the positions for the min and max *texts*: with
/// `reverse` set they trade places so the labels follow the fill direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    pub value: TextPlacement,
    pub label: Option<TextPlacement>,
    pub min: Option<TextPlacement>,
    pub max: Option<TextPlacement>,
    pub title: Option<TextPlacement>,
}

impl LabelLayout {
    pub fn compute(geometry: &Geometry, config: &GaugeConfig) -> Self {
        let donut = config.mode().is_donut();
        let w = geometry.widget_width;
        let h = geometry.widget_height;
        let dx = geometry.offset_x;
        let dy = geometry.offset_y;

        let value_x = dx + w / 2.0;
        let value_y = if !donut {
            dy + h / 1.275
        } else if config.label.is_empty() {
            dy + h / 1.7
        } else {
            dy + h / 1.85
        };

        let value_font = if donut {
            if h / 6.4 > 16.0 {
                h / 5.4
            } else {
                18.0
            }
        } else {
            (h / 6.5).max(config.value_min_font_size)
        };

        let label_font = if donut {
            (h / 16.0).max(10.0)
        } else {
            (h / 16.0).max(config.label_min_font_size)
        };

        let label = (!config.label.is_empty()).then(|| {
            let y = if donut {
                value_y + label_font
            } else {
                value_y + value_font / 2.0 + 5.0
            };
            TextPlacement::new(value_x, y, label_font)
        });

        let show_min_max = config.show_min_max && !config.hide_min_max && !donut;
        let (min, max) = if show_min_max {
            let y = value_y + value_font / 2.0 + 5.0;
            let inset = w / HALF_CIRCLE_MARGIN_DIVISOR
                + (w / BAND_WIDTH_DIVISOR) * config.gauge_width_scale / 2.0;
            let left = TextPlacement::new(dx + inset, y, label_font);
            let right = TextPlacement::new(dx + w - inset, y, label_font);
            if config.reverse {
                (Some(right), Some(left))
            } else {
                (Some(left), Some(right))
            }
        } else {
            (None, None)
        };

        let title = (!config.title.is_empty()).then(|| {
            TextPlacement::new(
                geometry.center_x,
                geometry.center_y - h / 16.0,
                (h / 16.0).max(10.0),
            )
        });

        Self {
            value: TextPlacement::new(value_x, value_y, value_font),
            label,
            min,
            max,
            title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::compute_geometry;
    use rg_gauge_types::GaugeMode;

    const EPS: f64 = 1e-9;

    fn layout(config: &GaugeConfig) -> LabelLayout {
        let geometry = compute_geometry(
            config.width,
            config.height,
            config.mode(),
            config.gauge_width_scale,
        );
        LabelLayout::compute(&geometry, config)
    }

    #[test]
    fn test_standard_layout() {
        let config = GaugeConfig {
            label: "rpm".to_string(),
            ..GaugeConfig::default()
        };
        let l = layout(&config);

        // 400x320 container: widget 400x200 at dy 60
        assert!((l.value.x - 200.0).abs() < EPS);
        assert!((l.value.y - (60.0 + 200.0 / 1.275)).abs() < EPS);
        // 200/6.5 is above the 16px floor
        assert!((l.value.font_size - 200.0 / 6.5).abs() < EPS);

        let label = l.label.unwrap();
        assert!((label.font_size - 12.5).abs() < EPS);
        assert!((label.y - (l.value.y + l.value.font_size / 2.0 + 5.0)).abs() < EPS);

        let min = l.min.unwrap();
        let max = l.max.unwrap();
        assert!((min.x - 70.0).abs() < 1e-6);
        assert!((max.x - 330.0).abs() < 1e-6);
        assert_eq!(min.y, max.y);
        assert!(l.title.is_none());
    }

    #[test]
    fn test_min_font_floors() {
        let config = GaugeConfig {
            width: 120.0,
            height: 80.0,
            label: "x".to_string(),
            ..GaugeConfig::default()
        };
        let l = layout(&config);
        assert_eq!(l.value.font_size, 16.0);
        assert_eq!(l.label.unwrap().font_size, 10.0);
    }

    #[test]
    fn test_reverse_swaps_min_max() {
        let plain = layout(&GaugeConfig::default());
        let reversed = layout(&GaugeConfig {
            reverse: true,
            ..GaugeConfig::default()
        });
        assert_eq!(reversed.min, plain.max);
        assert_eq!(reversed.max, plain.min);
    }

    #[test]
    fn test_donut_layout() {
        let with_label = layout(&GaugeConfig {
            mode: Some(GaugeMode::Donut),
            label: "%".to_string(),
            ..GaugeConfig::default()
        });
        // Square 320 widget at dy 0
        assert!((with_label.value.y - 320.0 / 1.85).abs() < EPS);
        assert!((with_label.value.font_size - 320.0 / 5.4).abs() < EPS);
        assert!(with_label.min.is_none() && with_label.max.is_none());
        let label = with_label.label.unwrap();
        assert!((label.y - (with_label.value.y + 20.0)).abs() < EPS);

        let bare = layout(&GaugeConfig {
            donut: true,
            ..GaugeConfig::default()
        });
        assert!((bare.value.y - 320.0 / 1.7).abs() < EPS);
        assert!(bare.label.is_none());
    }

    #[test]
    fn test_small_donut_value_font() {
        let l = layout(&GaugeConfig {
            mode: Some(GaugeMode::Donut),
            width: 90.0,
            height: 90.0,
            ..GaugeConfig::default()
        });
        assert_eq!(l.value.font_size, 18.0);
    }

    #[test]
    fn test_hidden_min_max_and_title() {
        let l = layout(&GaugeConfig {
            hide_min_max: true,
            title: "CPU".to_string(),
            ..GaugeConfig::default()
        });
        assert!(l.min.is_none());
        let title = l.title.unwrap();
        assert!((title.x - 200.0).abs() < EPS);
        assert!((title.y - (220.0 - 12.5)).abs() < EPS);
        assert_eq!(title.font_size, 12.5);

        let l = layout(&GaugeConfig {
            show_min_max: false,
            ..GaugeConfig::default()
        });
        assert!(l.max.is_none());
    }
}
