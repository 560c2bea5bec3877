//! Interface reload after the config has been rewritten
//!
//! The reload is a side effect with a success/failure outcome and no
//! rollback: by the time it runs, the config and ledger are already on disk.

mod wg_quick;

pub use wg_quick::WgQuick;

use async_trait::async_trait;
use std::fmt;
use std::process::ExitStatus;
use thiserror::Error;

/// Half of the down/up cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadStep {
    Down,
    Up,
}

impl ReloadStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReloadStep::Down => "down",
            ReloadStep::Up => "up",
        }
    }
}

impl fmt::Display for ReloadStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("failed to run `{program} {step}`: {source}")]
    Spawn {
        program: String,
        step: ReloadStep,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program} {step}` exited with {status}")]
    Failed {
        program: String,
        step: ReloadStep,
        status: ExitStatus,
    },
}

impl ReloadError {
    pub fn step(&self) -> ReloadStep {
        match self {
            ReloadError::Spawn { step, .. } | ReloadError::Failed { step, .. } => *step,
        }
    }
}

/// Re-applies the configuration to a running interface
#[async_trait]
pub trait Reloader: Send + Sync {
    /// Bring `interface` down then up, waiting for each step
    async fn reload(&self, interface: &str) -> Result<(), ReloadError>;
}
