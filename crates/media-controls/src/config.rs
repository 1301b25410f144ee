//! Configuration loading and parsing.
//!
//! Defines the engine config schema and resolves defaults.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw engine configuration loaded from TOML. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ControlsConfigFile {
    /// Poll interval for the position indicator, in milliseconds.
    pub poll_interval_ms: Option<u64>,
    /// Seek offset applied by the forward/backward buttons, in seconds.
    pub seek_step_secs: Option<f64>,
}

/// Resolved engine configuration.
#[derive(Clone, Copy, Debug)]
pub struct ControlsConfig {
    /// Interval between extrapolated position ticks.
    pub poll_interval: Duration,
    /// Seek offset for the forward/backward buttons, in seconds.
    pub seek_step: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            seek_step: 10.0,
        }
    }
}

impl ControlsConfig {
    /// Load configuration from disk, falling back to defaults for
    /// unspecified fields.
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            std::fs::read_to_string(path).with_context(|| format!("read config {:?}", path))?;
        let file = toml::from_str::<ControlsConfigFile>(&raw)
            .with_context(|| format!("parse config {:?}", path))?;
        Ok(Self::from_file(file))
    }

    /// Resolve a raw config file against defaults. Zero or negative
    /// values are treated as unset.
    pub fn from_file(file: ControlsConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: file
                .poll_interval_ms
                .map(Duration::from_millis)
                .filter(|interval| !interval.is_zero())
                .unwrap_or(defaults.poll_interval),
            seek_step: file
                .seek_step_secs
                .filter(|step| *step > 0.0)
                .unwrap_or(defaults.seek_step),
        }
    }
}
