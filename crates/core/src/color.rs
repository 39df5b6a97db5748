//! Value to fill color resolution
//!
//! The decision between custom sectors, a smooth gradient and stepped bands
//! is made once, when a [`ColorSource`] is built from the configuration.

use rg_gauge_types::{ColorStop, CustomSectors, Rgb};

/// Level colors laid out over the 0..1 ratio
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<ColorStop>,
    stepped: bool,
}

impl Gradient {
    /// Spread `colors` over the ratio range.
    ///
    /// Smooth gradients anchor color `i` at `i/(n−1)`. Stepped gradients give
    /// each color the band ending at `(i+1)/n`.
    pub fn new(colors: &[Rgb], stepped: bool) -> Self {
        let n = colors.len();
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let position = if stepped {
                    (i + 1) as f64 / n as f64
                } else if n > 1 {
                    i as f64 / (n - 1) as f64
                } else {
                    0.0
                };
                ColorStop::new(position, color)
            })
            .collect();

        Self { stops, stepped }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn is_stepped(&self) -> bool {
        self.stepped
    }

    /// Color at `ratio` (0.0..=1.0). Requires at least one stop.
    pub fn resolve(&self, ratio: f64) -> Rgb {
        debug_assert!(!self.stops.is_empty(), "gradient needs at least one color");
        let Some(first) = self.stops.first() else {
            return Rgb::BLACK;
        };

        if self.stops.len() == 1 || ratio == 0.0 {
            return first.color;
        }

        for (j, upper) in self.stops.iter().enumerate() {
            if ratio <= upper.position {
                if self.stepped {
                    return upper.color;
                }

                let lower = if j == 0 { upper } else { &self.stops[j - 1] };
                let range = upper.position - lower.position;
                if range <= 0.0 {
                    return upper.color;
                }

                let t = (ratio - lower.position) / range;
                return Rgb::new(
                    mix_channel(lower.color.r, upper.color.r, t),
                    mix_channel(lower.color.g, upper.color.g, t),
                    mix_channel(lower.color.b, upper.color.b, t),
                );
            }
        }

        // Only reachable for ratios above 1.0
        self.stops[self.stops.len() - 1].color
    }
}

fn mix_channel(lower: u8, upper: u8, t: f64) -> u8 {
    (lower as f64 * (1.0 - t) + upper as f64 * t)
        .floor()
        .clamp(0.0, 255.0) as u8
}

/// Where the level color comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSource {
    Gradient(Gradient),
    /// First matching sector wins; values outside every sector use the
    /// stepped fallback
    Sectors {
        sectors: CustomSectors,
        fallback: Gradient,
    },
}

impl ColorSource {
    /// Select the color source for a configuration.
    ///
    /// Active custom sectors force stepped bands for the fallback.
    pub fn new(colors: &[Rgb], no_gradient: bool, custom_sectors: Option<&CustomSectors>) -> Self {
        match custom_sectors {
            Some(sectors) if sectors.is_active() => ColorSource::Sectors {
                sectors: sectors.clone(),
                fallback: Gradient::new(colors, true),
            },
            _ => ColorSource::Gradient(Gradient::new(colors, no_gradient)),
        }
    }

    /// Resolve the color for `value`, whose position in the range is `ratio`.
    pub fn resolve(&self, value: f64, ratio: f64) -> Rgb {
        match self {
            ColorSource::Gradient(gradient) => gradient.resolve(ratio),
            ColorSource::Sectors { sectors, fallback } => {
                let probe = if sectors.percents { ratio * 100.0 } else { value };
                sectors
                    .ranges
                    .iter()
                    .find(|sector| sector.contains(probe))
                    .map(|sector| sector.color)
                    .unwrap_or_else(|| fallback.resolve(ratio))
            }
        }
    }
}

/// One-shot form of [`ColorSource::resolve`]
pub fn resolve_color(
    value: f64,
    ratio: f64,
    colors: &[Rgb],
    no_gradient: bool,
    custom_sectors: Option<&CustomSectors>,
) -> Rgb {
    ColorSource::new(colors, no_gradient, custom_sectors).resolve(value, ratio)
}
