//! Application configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use rg_gauge_core::ANIMATION_FRAME_MS;
use rg_gauge_types::GaugeConfig;

/// Current version of the config format
pub const CONFIG_VERSION: u32 = 1;

/// Application-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// Output size; overrides the gauge container size when set
    #[serde(default)]
    pub output: OutputConfig,
    /// Milliseconds between exported animation frames
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default)]
    pub gauge: GaugeConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_frame_interval_ms() -> u64 {
    ANIMATION_FRAME_MS
}

/// Rendered image size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct OutputConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            log::info!("No config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "github.hilgardt_collab", "rg-gauge")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        if config.version > CONFIG_VERSION {
            log::warn!(
                "Config {:?} has version {}, newer than supported {}",
                path,
                config.version,
                CONFIG_VERSION
            );
        }
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Gauge configuration with the output size applied
    pub fn effective_gauge(&self) -> GaugeConfig {
        let mut gauge = self.gauge.clone();
        if let Some(width) = self.output.width {
            gauge.width = width;
        }
        if let Some(height) = self.output.height {
            gauge.height = height;
        }
        gauge
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output: OutputConfig::default(),
            frame_interval_ms: default_frame_interval_ms(),
            gauge: GaugeConfig::default(),
        }
    }
}
