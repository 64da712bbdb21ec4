//! Configuration loading for the aggregator service
//!
//! Configuration comes from an optional TOML file; missing files fall back to
//! built-in defaults so the binary runs with zero setup. CLI flags override
//! whatever the file provides.

use crate::types::Port;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default listen host
fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default listen port
fn default_port() -> Port {
    Port::new(8080)
}

/// Default rate sampling interval in seconds
fn default_sample_interval_secs() -> u64 {
    1
}

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Host address to listen on
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: Port,
    /// Seconds between throughput rate samples
    #[serde(default = "default_sample_interval_secs")]
    pub sample_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            sample_interval_secs: default_sample_interval_secs(),
        }
    }
}

impl Config {
    /// Sampling interval as a [`std::time::Duration`]
    #[must_use]
    pub fn sample_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sample_interval_secs)
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Defaults,
}

impl ConfigSource {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::File => "configuration file",
            Self::Defaults => "built-in defaults",
        }
    }
}

/// Load configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Load configuration, falling back to defaults when the file is absent
///
/// A file that exists but fails to parse is still an error; only a missing
/// file triggers the fallback.
///
/// # Errors
/// Returns an error if an existing file cannot be read or parsed.
pub fn load_config_with_fallback<P: AsRef<Path>>(path: P) -> Result<(Config, ConfigSource)> {
    let path = path.as_ref();
    if path.exists() {
        Ok((load_config(path)?, ConfigSource::File))
    } else {
        Ok((Config::default(), ConfigSource::Defaults))
    }
}
