use super::models::Config;
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// `IFNAMSIZ - 1` on Linux
const MAX_INTERFACE_LEN: usize = 15;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },

    #[error("Ledger path {} must differ from the WireGuard config path", .0.display())]
    SamePath(PathBuf),

    #[error("Invalid interface name '{name}': {reason}")]
    InvalidInterface { name: String, reason: &'static str },

    #[error("reload.program must not be empty when reload is enabled")]
    EmptyReloadProgram,

    #[error("Invalid logging level '{0}'")]
    InvalidLogLevel(String),
}

/// Validate the complete configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_paths(config)?;
    validate_interface(&config.wireguard.interface)?;
    validate_reload(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_paths(config: &Config) -> Result<(), ValidationError> {
    if config.wireguard.config_path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyPath {
            field: "wireguard.config_path",
        });
    }
    if config.ledger.path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyPath {
            field: "ledger.path",
        });
    }
    if config.ledger.path == config.wireguard.config_path {
        return Err(ValidationError::SamePath(config.ledger.path.clone()));
    }
    Ok(())
}

/// Same character set `wg-quick` accepts
pub fn validate_interface(name: &str) -> Result<(), ValidationError> {
    let invalid = |reason| ValidationError::InvalidInterface {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.len() > MAX_INTERFACE_LEN {
        return Err(invalid("longer than 15 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '=' | '+' | '.' | '-'))
    {
        return Err(invalid("only [a-zA-Z0-9_=+.-] are allowed"));
    }
    Ok(())
}

fn validate_reload(config: &Config) -> Result<(), ValidationError> {
    if config.reload.enabled && config.reload.program.trim().is_empty() {
        return Err(ValidationError::EmptyReloadProgram);
    }
    Ok(())
}

fn validate_logging(config: &Config) -> Result<(), ValidationError> {
    if EnvFilter::try_new(&config.logging.level).is_err() {
        return Err(ValidationError::InvalidLogLevel(config.logging.level.clone()));
    }
    Ok(())
}
