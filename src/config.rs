//! # Checkout Simulator Configuration
//!
//! Defaults for simulation runs and the HTTP host, loaded from TOML.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [simulation]
//! horizon = 120.0
//! capacity = 3
//! arrival_rate = 2.0
//! base_service_time = 4.0
//! basket_behavior = "seasonal"
//! seed = 42
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! cors_enabled = false
//! ```
//!
//! Every field is optional; anything missing falls back to the defaults of
//! [`SimulationParams`] and [`ServerConfig`].

// src/config.rs - Single configuration file
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkout::SimulationParams;
use crate::error::SimError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid simulation defaults: {0}")]
    Invalid(#[from] SimError),
}

/// Main configuration struct
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationParams,
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP host configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Answer cross-origin requests from browser front ends
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_enabled: default_cors_enabled(),
        }
    }
}

fn default_bind() -> String { "0.0.0.0:5000".to_string() }
fn default_cors_enabled() -> bool { true }

/// Parse and validate configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(contents)?;
    config.simulation.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read config file '{}': {}", path, e);
        ConfigError::Io(e)
    })?;
    parse_config(&contents).inspect_err(|e| {
        tracing::error!("Failed to load config '{}': {}", path, e);
    })
}
