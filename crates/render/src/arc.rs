//! Endpoint arcs to center arcs
//!
//! Path arcs are given SVG style (current point, radius, flags, end point).
//! Cairo and most immediate-mode APIs want a center and two angles instead.

/// Circular arc in center form. Angles are in screen space (y down), so
/// increasing angles run clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterArc {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Direction of increasing angle (the SVG sweep flag)
    pub positive: bool,
}

/// Convert an endpoint arc on a circle to center form.
///
/// Radii too small to span the chord are scaled up. Returns `None` when the
/// arc degenerates (coincident end points or zero radius); such arcs draw as
/// a straight line.
pub fn endpoint_to_center(
    from: (f64, f64),
    radius: f64,
    large_arc: bool,
    sweep: bool,
    to: (f64, f64),
) -> Option<CenterArc> {
    let hx = (from.0 - to.0) / 2.0;
    let hy = (from.1 - to.1) / 2.0;
    let half_chord_sq = hx * hx + hy * hy;
    let mut r = radius.abs();
    if half_chord_sq == 0.0 || r == 0.0 {
        return None;
    }

    let k = if r * r < half_chord_sq {
        r = half_chord_sq.sqrt();
        0.0
    } else {
        ((r * r - half_chord_sq) / half_chord_sq).sqrt()
    };

    let (mut ox, mut oy) = (k * hy, -k * hx);
    if large_arc == sweep {
        ox = -ox;
        oy = -oy;
    }

    Some(CenterArc {
        cx: ox + (from.0 + to.0) / 2.0,
        cy: oy + (from.1 + to.1) / 2.0,
        radius: r,
        start_angle: (hy - oy).atan2(hx - ox),
        end_angle: (-hy - oy).atan2(-hx - ox),
        positive: sweep,
    })
}
