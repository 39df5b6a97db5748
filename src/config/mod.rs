//! Configuration management

mod settings;

pub use settings::{AppConfig, OutputConfig, CONFIG_VERSION};
