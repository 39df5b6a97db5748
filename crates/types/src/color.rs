//! Foundational color types used throughout rg-gauge.
//!
//! `Rgb`, `ColorStop` and the custom sector types are the building blocks
//! for all color configuration of a gauge.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when a hex color string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("invalid hex color length in {0:?} (expected 3 or 6 digits)")]
    Length(String),
    #[error("invalid hex digit in {0:?}")]
    Digit(String),
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `#rgb`, or the same without the leading `#`.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !digits.is_ascii() {
            return Err(ColorParseError::Digit(s.to_string()));
        }
        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(ColorParseError::Length(s.to_string())),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| ColorParseError::Digit(s.to_string()))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Check whether a string is a `#rgb` / `#rrggbb` color
    pub fn is_hex_color(s: &str) -> bool {
        s.starts_with('#') && Self::from_hex(s).is_ok()
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as floats in 0.0..=1.0 (for Cairo-style APIs)
    pub fn to_unit_rgb(&self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Color stop anchored at a ratio of the gauge range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColorStop {
    pub position: f64, // 0.0 to 1.0
    pub color: Rgb,
}

impl ColorStop {
    pub fn new(position: f64, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// A fixed-color band of the gauge range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sector {
    pub lo: f64,
    pub hi: f64,
    pub color: Rgb,
}

impl Sector {
    pub fn new(lo: f64, hi: f64, color: Rgb) -> Self {
        Self { lo, hi, color }
    }

    /// Inclusive on both ends
    pub fn contains(&self, probe: f64) -> bool {
        self.lo <= probe && probe <= self.hi
    }
}

/// User supplied sectors that override the level colors
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomSectors {
    /// When set, `lo`/`hi` are percentages of the range instead of raw values
    #[serde(default)]
    pub percents: bool,
    #[serde(default)]
    pub ranges: Vec<Sector>,
}

impl CustomSectors {
    pub fn is_active(&self) -> bool {
        !self.ranges.is_empty()
    }
}
