//! Shared constants for gauge geometry and animation
//!
//! The geometry fractions are shared by the arc, the pointer and the label
//! placement. They must stay in formula form so every element agrees on the
//! same radii down to the last bit.

use std::time::Duration;

/// Animation frame interval for smooth 60fps animations (16ms)
pub const ANIMATION_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Animation frame interval in milliseconds (useful for calculations)
pub const ANIMATION_FRAME_MS: u64 = 16;

/// Divisor applied to the widget width to get the band thickness at scale 1.0
pub const BAND_WIDTH_DIVISOR: f64 = 20.0 / 3.0;

/// Margin between the widget edge and the outer radius, standard/differential
pub const HALF_CIRCLE_MARGIN_DIVISOR: f64 = 10.0;

/// Margin between the widget edge and the outer radius, donut
pub const DONUT_MARGIN_DIVISOR: f64 = 30.0;

/// Half-circle centers sit at `widget_height / 1.25` below the box top
pub const HALF_CIRCLE_CENTER_DIVISOR: f64 = 1.25;

/// Target line starts slightly inside the band...
pub const TARGET_LINE_INNER_FACTOR: f64 = 0.9;

/// ...and overshoots it slightly on the outside
pub const TARGET_LINE_OUTER_FACTOR: f64 = 1.05;
