//! Easing curves for value animations

use std::f64::consts::PI;

use rg_gauge_types::EasingKind;

/// Map linear progress `p` in 0.0..=1.0 through the selected curve.
///
/// Every curve maps 0 to 0 and 1 to 1. Back and elastic curves overshoot in
/// between.
pub fn ease(kind: EasingKind, p: f64) -> f64 {
    match kind {
        EasingKind::Linear => p,
        EasingKind::EaseOut => p.powf(0.48),
        EasingKind::EaseIn => p.powf(1.7),
        EasingKind::EaseInOut => {
            if p < 0.5 {
                2.0 * p * p
            } else {
                1.0 - (-2.0 * p + 2.0).powi(2) / 2.0
            }
        }
        EasingKind::Bounce => bounce_out(p),
        EasingKind::Elastic => {
            // The raw curve ends at 1 + 2^-10·sin(π/6); pin the end points
            if p <= 0.0 {
                0.0
            } else if p >= 1.0 {
                1.0
            } else {
                2f64.powf(-10.0 * p) * ((p - 0.075) * (2.0 * PI) / 0.3).sin() + 1.0
            }
        }
        EasingKind::BackIn => {
            let c1 = 1.70158;
            let c3 = c1 + 1.0;
            c3 * p * p * p - c1 * p * p
        }
        EasingKind::BackOut => {
            let c2 = 1.70158;
            let c4 = c2 + 1.0;
            1.0 + c4 * (p - 1.0).powi(3) + c2 * (p - 1.0).powi(2)
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}
