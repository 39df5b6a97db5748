//! Widget box, center and radii for a container size

use rg_gauge_types::{GaugeMode, Geometry};

use crate::constants::{
    BAND_WIDTH_DIVISOR, DONUT_MARGIN_DIVISOR, HALF_CIRCLE_CENTER_DIVISOR,
    HALF_CIRCLE_MARGIN_DIVISOR,
};

/// Resolve the gauge geometry for a container.
///
/// Half-circle gauges (standard and differential) use a 2:1 widget box,
/// donuts use the largest square. `width_scale` is not clamped: a scale large
/// enough to push the inner radius below zero yields a degenerate shape.
pub fn compute_geometry(
    container_w: f64,
    container_h: f64,
    mode: GaugeMode,
    width_scale: f64,
) -> Geometry {
    let (widget_w, widget_h) = match mode {
        GaugeMode::Donut => {
            let side = container_w.min(container_h);
            (side, side)
        }
        GaugeMode::Standard | GaugeMode::Differential => {
            if container_w > container_h {
                let mut h = container_h;
                let mut w = h * 2.0;
                if w > container_w {
                    let aspect = w / container_w;
                    w /= aspect;
                    h /= aspect;
                }
                (w, h)
            } else {
                (container_w, container_w / 2.0)
            }
        }
    };

    let offset_x = (container_w - widget_w) / 2.0;
    let offset_y = (container_h - widget_h) / 2.0;

    let (center_y, outer_radius) = if mode.is_donut() {
        (
            offset_y + widget_h / 2.0,
            widget_w / 2.0 - widget_w / DONUT_MARGIN_DIVISOR,
        )
    } else {
        (
            offset_y + widget_h / HALF_CIRCLE_CENTER_DIVISOR,
            widget_w / 2.0 - widget_w / HALF_CIRCLE_MARGIN_DIVISOR,
        )
    };
    let inner_radius = outer_radius - (widget_w / BAND_WIDTH_DIVISOR) * width_scale;

    if inner_radius < 0.0 {
        log::debug!(
            "Width scale {} inverts the gauge band (inner radius {:.2})",
            width_scale,
            inner_radius
        );
    }

    Geometry {
        widget_width: widget_w,
        widget_height: widget_h,
        offset_x,
        offset_y,
        center_x: offset_x + widget_w / 2.0,
        center_y,
        outer_radius,
        inner_radius,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GeometryKey {
    container_w: f64,
    container_h: f64,
    mode: GaugeMode,
    width_scale: f64,
}

/// Single-entry geometry cache, invalidated by any change of size, mode or scale
#[derive(Debug, Default)]
pub struct GeometryCache {
    entry: Option<(GeometryKey, Geometry)>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        container_w: f64,
        container_h: f64,
        mode: GaugeMode,
        width_scale: f64,
    ) -> Geometry {
        let key = GeometryKey {
            container_w,
            container_h,
            mode,
            width_scale,
        };
        match self.entry {
            Some((cached_key, geometry)) if cached_key == key => geometry,
            _ => {
                let geometry = compute_geometry(container_w, container_h, mode, width_scale);
                self.entry = Some((key, geometry));
                geometry
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }
}
