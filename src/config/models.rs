use crate::humanize::Days;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub wireguard: WireGuardConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub expiration: ExpirationConfig,
    #[serde(default)]
    pub reload: ReloadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Managed WireGuard interface
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireGuardConfig {
    /// Config file holding the peer blocks
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,
    /// Interface passed to the reload command
    #[serde(default = "default_interface")]
    pub interface: String,
}

impl Default for WireGuardConfig {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            interface: default_interface(),
        }
    }
}

fn default_config_path() -> PathBuf {
    PathBuf::from("/etc/wireguard/wg0.conf")
}

fn default_interface() -> String {
    "wg0".to_string()
}

/// Audit ledger location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    #[serde(default = "default_ledger_path")]
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("peers.csv")
}

/// Peer expiration policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExpirationConfig {
    /// Maximum peer age; a peer exactly this old is kept
    #[serde(default = "default_threshold")]
    pub threshold: Days,
}

impl Default for ExpirationConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

pub const DEFAULT_THRESHOLD_DAYS: u32 = 30;

fn default_threshold() -> Days {
    Days(DEFAULT_THRESHOLD_DAYS)
}

/// Interface reload after a successful run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReloadConfig {
    #[serde(default = "default_reload_enabled")]
    pub enabled: bool,
    /// Invoked as `<program> down <iface>` then `<program> up <iface>`
    #[serde(default = "default_reload_program")]
    pub program: String,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: default_reload_enabled(),
            program: default_reload_program(),
        }
    }
}

fn default_reload_enabled() -> bool {
    true
}

fn default_reload_program() -> String {
    "wg-quick".to_string()
}

/// Log output
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Append logs to this file instead of stderr
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
