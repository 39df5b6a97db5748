//! Built-in displayers
//!
//! A displayer owns a render surface and keeps what is drawn on it in sync
//! with its value and configuration.

mod gauge;

pub use gauge::{GaugeDisplayer, GaugeError, GaugeUpdate};
