//! Tracing subscriber setup
//!
//! Installed once from `main` after configuration is loaded. `RUST_LOG`
//! takes precedence over `[logging] level`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter '{directive}': {source}")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },

    #[error("Cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Build the event filter: `RUST_LOG` if set, else the configured level
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ObservabilityError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|source| ObservabilityError::Filter {
            directive: config.level.clone(),
            source,
        }),
    }
}

/// Install the global subscriber
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| ObservabilityError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            let writer = Mutex::new(file);
            if config.json {
                builder.json().with_writer(writer).with_ansi(false).try_init()
            } else {
                builder.with_writer(writer).with_ansi(false).try_init()
            }
        }
        None if config.json => builder.json().try_init(),
        None => builder.try_init(),
    };

    installed.map_err(|e| ObservabilityError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        // Only meaningful when RUST_LOG is not set by the test runner
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "wgprune=shout".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            env_filter(&config),
            Err(ObservabilityError::Filter { .. })
        ));
    }

    #[test]
    fn test_unwritable_log_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = LoggingConfig {
            file: Some(temp_dir.path().join("missing-dir").join("wgprune.log")),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            init_tracing(&config),
            Err(ObservabilityError::LogFile { .. })
        ));
    }
}
