//! rg-gauge: Animated radial gauges rendered to vector surfaces
//!
//! This library provides:
//! - The gauge displayer that draws, animates and updates a gauge
//! - Application configuration loading
//!
//! Geometry, paths, colors and animation live in `rg-gauge-core`; surfaces
//! live in `rg-gauge-render`.

pub mod config;
pub mod displayers;

// Re-export commonly used types
pub use config::AppConfig;
pub use displayers::{GaugeDisplayer, GaugeError, GaugeUpdate};
pub use rg_gauge_core::{ClockTicker, ManualTicker, RenderSurface, Ticker};
pub use rg_gauge_render::SvgSurface;
pub use rg_gauge_types::{GaugeConfig, GaugeMode};
