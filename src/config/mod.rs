//! Configuration management for wgprune
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//! 4. Command-line overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use wgprune::config::Config;
//!
//! let config = Config::load(None).expect("Failed to load configuration");
//! println!("Pruning peers of: {}", config.wireguard.interface);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `WGPRUNE__<section>__<key>`
//!
//! Examples:
//! - `WGPRUNE__EXPIRATION__THRESHOLD=45d`
//! - `WGPRUNE__WIREGUARD__INTERFACE=wg1`
//! - `WGPRUNE__RELOAD__ENABLED=false`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/wgprune.toml`.
//! This can be overridden using the `WGPRUNE_CONFIG` environment variable
//! or the `--settings` flag.

mod models;
mod sources;
mod validation;

// Re-export public types
pub use crate::humanize::Days;
pub use models::{
    Config, DEFAULT_THRESHOLD_DAYS, ExpirationConfig, LedgerConfig, LoggingConfig,
    ReloadConfig, WireGuardConfig,
};
pub use validation::{ValidationError, validate_interface};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// `path` selects the TOML file; when `None`, `WGPRUNE_CONFIG` or the
    /// default `config/wgprune.toml` is used. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_overrides(path, |_| {})
    }

    /// Load configuration, apply caller overrides, then validate
    pub fn load_with_overrides<F>(path: Option<PathBuf>, overrides: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = sources::load(path)?;
        overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }

    /// Expiration threshold in whole days
    pub fn threshold_days(&self) -> u32 {
        self.expiration.threshold.as_u32()
    }
}
