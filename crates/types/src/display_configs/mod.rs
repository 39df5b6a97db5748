//! Display configuration types

pub mod gauge;

// Re-export commonly used types
pub use gauge::{default_level_colors, ConfigError, GaugeConfig, PointerOptions};
