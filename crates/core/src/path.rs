//! Vector path construction for the level arc, the pointer needle and the
//! target line.
//!
//! All three builders share one angle parameterization, [`value_angle`]:
//! the value maps linearly onto a π sweep (2π for donuts), with the minimum
//! at π (leftmost) and the maximum at 0 (rightmost, or back to the left for
//! donuts). Y grows downward, so a point at angle `a` and radius `r` sits at
//! `(cx + r·cos a, cy − r·sin a)`.

use std::f64::consts::PI;
use std::fmt;

use rg_gauge_types::{GaugeMode, Geometry, PointerOptions};

use crate::constants::{TARGET_LINE_INNER_FACTOR, TARGET_LINE_OUTER_FACTOR};

/// A single path primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    Arc {
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    Close,
}

impl PathCommand {
    /// Circular arc with no axis rotation
    pub fn arc(radius: f64, large_arc: bool, sweep: bool, x: f64, y: f64) -> Self {
        PathCommand::Arc {
            rx: radius,
            ry: radius,
            x_rotation: 0.0,
            large_arc,
            sweep,
            x,
            y,
        }
    }

    /// End point of the command, if it has one
    pub fn end_point(&self) -> Option<(f64, f64)> {
        match *self {
            PathCommand::MoveTo { x, y }
            | PathCommand::LineTo { x, y }
            | PathCommand::Arc { x, y, .. } => Some((x, y)),
            PathCommand::Close => None,
        }
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PathCommand::MoveTo { x, y } => write!(f, "M{},{}", x, y),
            PathCommand::LineTo { x, y } => write!(f, "L{},{}", x, y),
            PathCommand::Arc {
                rx,
                ry,
                x_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => write!(
                f,
                "A{},{} {} {} {} {},{}",
                rx, ry, x_rotation, large_arc as u8, sweep as u8, x, y
            ),
            PathCommand::Close => f.write_str("Z"),
        }
    }
}

/// Ordered list of path commands
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathDescription {
    commands: Vec<PathCommand>,
}

impl PathDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::MoveTo { x, y });
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::LineTo { x, y });
        self
    }

    pub fn arc_to(mut self, radius: f64, large_arc: bool, sweep: bool, x: f64, y: f64) -> Self {
        self.commands
            .push(PathCommand::arc(radius, large_arc, sweep, x, y));
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn arc_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::Arc { .. }))
            .count()
    }
}

/// SVG path data (`d` attribute)
impl fmt::Display for PathDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", cmd)?;
        }
        Ok(())
    }
}

/// Angle in radians for a value.
///
/// Half circles: `(1 − ratio)·π`. Donuts sweep the full circle:
/// `(1 − 2·ratio)·π`.
pub fn value_angle(value: f64, min: f64, max: f64, mode: GaugeMode) -> f64 {
    let ratio = (value - min) / (max - min);
    match mode {
        GaugeMode::Donut => (1.0 - 2.0 * ratio) * PI,
        GaugeMode::Standard | GaugeMode::Differential => (1.0 - ratio) * PI,
    }
}

fn polar(cx: f64, cy: f64, radius: f64, alpha: f64) -> (f64, f64) {
    (cx + radius * alpha.cos(), cy - radius * alpha.sin())
}

/// Build the filled band from `min` up to `value`.
///
/// `value` is expected inside `[min, max]`. The band thickness comes from
/// the geometry, which already folds in the width scale.
pub fn build_arc_path(
    value: f64,
    min: f64,
    max: f64,
    geometry: &Geometry,
    mode: GaugeMode,
) -> PathDescription {
    let (mut value, mut min, mut max) = (value, min, max);

    // Negative ranges are shifted to start at zero, except for differential gauges
    if min < 0.0 && mode != GaugeMode::Differential {
        max -= min;
        value -= min;
        min = 0.0;
    }

    let alpha = value_angle(value, min, max, mode);
    let cx = geometry.center_x;
    let cy = geometry.center_y;
    let ro = geometry.outer_radius;
    let ri = geometry.inner_radius;
    let (xo, yo) = polar(cx, cy, ro, alpha);
    let (xi, yi) = polar(cx, cy, ri, alpha);

    match mode {
        GaugeMode::Standard => PathDescription::new()
            .move_to(cx - ri, cy)
            .line_to(cx - ro, cy)
            .arc_to(ro, false, true, xo, yo)
            .line_to(xi, yi)
            .arc_to(ri, false, false, cx - ri, cy)
            .close(),
        GaugeMode::Donut => {
            // A single arc command cannot pass the half-circle mark with a fixed
            // large-arc flag, so past the midpoint route through the opposite pole.
            let past_half = value - min > (max - min) / 2.0;

            let mut path = PathDescription::new()
                .move_to(cx - ri, cy)
                .line_to(cx - ro, cy);
            if past_half {
                path = path.arc_to(ro, false, true, cx + ro, cy);
            }
            path = path.arc_to(ro, false, true, xo, yo).line_to(xi, yi);
            if past_half {
                path = path.arc_to(ri, false, false, cx + ri, cy);
            }
            path.arc_to(ri, false, false, cx - ri, cy).close()
        }
        GaugeMode::Differential => {
            let middle = min + (max - min) / 2.0;
            let below = value < middle;
            let outer_sweep = !below;
            let inner_sweep = below;

            PathDescription::new()
                .move_to(cx, cy - ri)
                .line_to(cx, cy - ro)
                .arc_to(ro, false, outer_sweep, xo, yo)
                .line_to(xi, yi)
                .arc_to(ri, false, inner_sweep, cx, cy - ri)
                .close()
        }
    }
}

/// Needle dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDimensions {
    /// How far the tip reaches past the outer radius
    pub top_length: f64,
    /// How far the base sits inside the inner radius
    pub bottom_length: f64,
    /// Full width of the needle base
    pub bottom_width: f64,
}

impl PointerDimensions {
    /// Fill unset options from the widget width
    pub fn resolve(options: &PointerOptions, geometry: &Geometry) -> Self {
        let w = geometry.widget_width;
        Self {
            top_length: options.top_length.unwrap_or(w * 3.5 / 100.0),
            bottom_length: options.bottom_length.unwrap_or(w / 15.0),
            bottom_width: options.bottom_width.unwrap_or(w / 50.0),
        }
    }
}

/// Build the triangular pointer needle for `value`.
pub fn build_pointer_path(
    value: f64,
    min: f64,
    max: f64,
    geometry: &Geometry,
    mode: GaugeMode,
    dims: &PointerDimensions,
) -> PathDescription {
    let alpha = value_angle(value, min, max, mode);
    let cx = geometry.center_x;
    let cy = geometry.center_y;

    let (tip_x, tip_y) = polar(cx, cy, geometry.outer_radius + dims.top_length, alpha);
    let (base_x, base_y) = polar(cx, cy, geometry.inner_radius - dims.bottom_length, alpha);

    // Perpendicular to the radial direction (cos a, −sin a)
    let half = dims.bottom_width / 2.0;
    let (px, py) = (half * alpha.sin(), half * alpha.cos());

    PathDescription::new()
        .move_to(base_x + px, base_y + py)
        .line_to(base_x - px, base_y - py)
        .line_to(tip_x, tip_y)
        .close()
}

/// Build the radial target tick for `target`.
///
/// With `reverse` the tick is mirrored, matching the reversed level arc.
pub fn build_target_line_path(
    target: f64,
    min: f64,
    max: f64,
    geometry: &Geometry,
    mode: GaugeMode,
    reverse: bool,
) -> PathDescription {
    let target = if reverse { max + min - target } else { target };
    let alpha = value_angle(target, min, max, mode);
    let cx = geometry.center_x;
    let cy = geometry.center_y;

    let (x0, y0) = polar(cx, cy, geometry.inner_radius * TARGET_LINE_INNER_FACTOR, alpha);
    let (x1, y1) = polar(cx, cy, geometry.outer_radius * TARGET_LINE_OUTER_FACTOR, alpha);

    PathDescription::new().move_to(x0, y0).line_to(x1, y1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::compute_geometry;

    const EPS: f64 = 1e-9;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS
    }

    fn standard() -> Geometry {
        compute_geometry(400.0, 320.0, GaugeMode::Standard, 1.0)
    }

    fn donut() -> Geometry {
        compute_geometry(400.0, 400.0, GaugeMode::Donut, 1.0)
    }

    #[test]
    fn test_angle_boundaries() {
        assert_eq!(value_angle(0.0, 0.0, 100.0, GaugeMode::Standard), PI);
        assert_eq!(value_angle(100.0, 0.0, 100.0, GaugeMode::Standard), 0.0);
        assert_eq!(value_angle(-50.0, -50.0, 50.0, GaugeMode::Differential), PI);
        assert_eq!(value_angle(50.0, -50.0, 50.0, GaugeMode::Differential), 0.0);
        assert_eq!(value_angle(0.0, 0.0, 100.0, GaugeMode::Donut), PI);
        assert_eq!(value_angle(100.0, 0.0, 100.0, GaugeMode::Donut), -PI);
        assert_eq!(value_angle(50.0, 0.0, 100.0, GaugeMode::Donut), 0.0);
    }

    #[test]
    fn test_standard_shape() {
        let g = standard();
        let path = build_arc_path(50.0, 0.0, 100.0, &g, GaugeMode::Standard);
        let cmds = path.commands();
        assert_eq!(cmds.len(), 6);
        assert_eq!(
            cmds[0],
            PathCommand::MoveTo {
                x: g.center_x - g.inner_radius,
                y: g.center_y
            }
        );
        assert_eq!(cmds[1], PathCommand::LineTo { x: 40.0, y: 220.0 });
        match cmds[2] {
            PathCommand::Arc {
                rx,
                large_arc,
                sweep,
                x,
                y,
                ..
            } => {
                assert_eq!(rx, 160.0);
                assert!(!large_arc);
                assert!(sweep);
                // Halfway is the top of the circle
                assert!(close((x, y), (200.0, 60.0)));
            }
            other => panic!("expected arc, got {:?}", other),
        }
        assert!(matches!(cmds[4], PathCommand::Arc { sweep: false, .. }));
        assert_eq!(cmds[5], PathCommand::Close);
    }

    #[test]
    fn test_standard_min_is_zero_sweep() {
        let g = standard();
        let path = build_arc_path(0.0, 0.0, 100.0, &g, GaugeMode::Standard);
        let end = path.commands()[2].end_point().unwrap();
        // The outer arc ends where it started
        assert!(close(end, (g.center_x - g.outer_radius, g.center_y)));
    }

    #[test]
    fn test_standard_max_is_full_sweep() {
        let g = standard();
        let path = build_arc_path(100.0, 0.0, 100.0, &g, GaugeMode::Standard);
        let end = path.commands()[2].end_point().unwrap();
        assert!(close(end, (g.center_x + g.outer_radius, g.center_y)));
    }

    #[test]
    fn test_negative_min_is_normalized() {
        let g = standard();
        let shifted = build_arc_path(0.0, -50.0, 50.0, &g, GaugeMode::Standard);
        let plain = build_arc_path(50.0, 0.0, 100.0, &g, GaugeMode::Standard);
        assert_eq!(shifted, plain);
    }

    #[test]
    fn test_donut_extra_segment_past_half() {
        let g = donut();
        let low = build_arc_path(40.0, 0.0, 100.0, &g, GaugeMode::Donut);
        assert_eq!(low.arc_count(), 2);

        let half = build_arc_path(50.0, 0.0, 100.0, &g, GaugeMode::Donut);
        assert_eq!(half.arc_count(), 2);

        let high = build_arc_path(75.0, 0.0, 100.0, &g, GaugeMode::Donut);
        assert_eq!(high.arc_count(), 4);
        // First outer arc goes through the opposite pole
        let pole = high.commands()[2].end_point().unwrap();
        assert!(close(pole, (g.center_x + g.outer_radius, g.center_y)));
        // Three quarters lands at the bottom of the ring
        let end = high.commands()[3].end_point().unwrap();
        assert!(close(end, (g.center_x, g.center_y + g.outer_radius)));
    }

    #[test]
    fn test_differential_sweeps_flip_at_midpoint() {
        let g = compute_geometry(400.0, 320.0, GaugeMode::Differential, 1.0);
        let left = build_arc_path(-25.0, -50.0, 50.0, &g, GaugeMode::Differential);
        let right = build_arc_path(25.0, -50.0, 50.0, &g, GaugeMode::Differential);

        let sweeps = |p: &PathDescription| -> Vec<bool> {
            p.commands()
                .iter()
                .filter_map(|c| match c {
                    PathCommand::Arc { sweep, .. } => Some(*sweep),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(sweeps(&left), vec![false, true]);
        assert_eq!(sweeps(&right), vec![true, false]);

        // Baseline sits at the top of the shape
        assert_eq!(
            left.commands()[1],
            PathCommand::LineTo {
                x: g.center_x,
                y: g.center_y - g.outer_radius
            }
        );
        // Bar grows left of center below the midpoint
        let (x, _) = left.commands()[2].end_point().unwrap();
        assert!(x < g.center_x);
        let (x, _) = right.commands()[2].end_point().unwrap();
        assert!(x > g.center_x);
    }

    #[test]
    fn test_pointer_is_triangle() {
        let g = standard();
        let dims = PointerDimensions::resolve(&PointerOptions::default(), &g);
        assert_eq!(dims.top_length, 14.0);
        assert!((dims.bottom_length - 400.0 / 15.0).abs() < EPS);
        assert_eq!(dims.bottom_width, 8.0);

        let path = build_pointer_path(50.0, 0.0, 100.0, &g, GaugeMode::Standard, &dims);
        let cmds = path.commands();
        assert_eq!(cmds.len(), 4);
        assert_eq!(path.arc_count(), 0);

        // Pointing straight up: tip above the outer radius, base corners side by side
        let tip = cmds[2].end_point().unwrap();
        assert!(close(tip, (g.center_x, g.center_y - g.outer_radius - 14.0)));
        let a = cmds[0].end_point().unwrap();
        let b = cmds[1].end_point().unwrap();
        let base_y = g.center_y - (g.inner_radius - dims.bottom_length);
        assert!(close(a, (g.center_x + 4.0, base_y)));
        assert!(close(b, (g.center_x - 4.0, base_y)));
    }

    #[test]
    fn test_pointer_options_override() {
        let g = standard();
        let options = PointerOptions {
            top_length: Some(2.0),
            bottom_length: Some(3.0),
            bottom_width: Some(10.0),
            ..Default::default()
        };
        let dims = PointerDimensions::resolve(&options, &g);
        assert_eq!(
            dims,
            PointerDimensions {
                top_length: 2.0,
                bottom_length: 3.0,
                bottom_width: 10.0
            }
        );
    }

    #[test]
    fn test_target_line_spans_band() {
        let g = standard();
        let path = build_target_line_path(50.0, 0.0, 100.0, &g, GaugeMode::Standard, false);
        let cmds = path.commands();
        assert_eq!(cmds.len(), 2);
        let start = cmds[0].end_point().unwrap();
        let end = cmds[1].end_point().unwrap();
        assert!(close(start, (g.center_x, g.center_y - 0.9 * g.inner_radius)));
        assert!(close(end, (g.center_x, g.center_y - 1.05 * g.outer_radius)));
    }

    #[test]
    fn test_target_line_reverse_mirrors() {
        let g = standard();
        let normal = build_target_line_path(25.0, 0.0, 100.0, &g, GaugeMode::Standard, false);
        let reversed = build_target_line_path(25.0, 0.0, 100.0, &g, GaugeMode::Standard, true);
        let (xn, yn) = normal.commands()[1].end_point().unwrap();
        let (xr, yr) = reversed.commands()[1].end_point().unwrap();
        assert!((xn - g.center_x + (xr - g.center_x)).abs() < EPS);
        assert!((yn - yr).abs() < EPS);
    }

    #[test]
    fn test_svg_path_data() {
        let path = PathDescription::new()
            .move_to(1.0, 2.5)
            .line_to(3.0, 4.0)
            .arc_to(5.0, false, true, 6.0, 7.0)
            .close();
        assert_eq!(path.to_string(), "M1,2.5 L3,4 A5,5 0 0 1 6,7 Z");
    }
}
