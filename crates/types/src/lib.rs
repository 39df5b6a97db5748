//! rg-gauge-types: Shared data types for rg-gauge radial gauges.
//!
//! This crate contains pure data types (colors, modes, geometry, easing
//! selection, gauge configuration) that are shared across all rg-gauge
//! crates. They carry no rendering dependencies, making them suitable as a
//! foundation layer.

pub mod color;
pub mod display_configs;
pub mod easing;
pub mod gauge;

// Re-export commonly used types at the crate root for convenience
pub use color::{ColorParseError, ColorStop, CustomSectors, Rgb, Sector};
pub use display_configs::{ConfigError, GaugeConfig, PointerOptions};
pub use easing::EasingKind;
pub use gauge::{ratio_of, GaugeMode, GaugeState, Geometry};
