use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::{ReloadError, ReloadStep, Reloader};

/// `wg-quick down <iface> && wg-quick up <iface>`
#[derive(Debug, Clone)]
pub struct WgQuick {
    program: String,
}

impl WgQuick {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run_step(&self, step: ReloadStep, interface: &str) -> Result<(), ReloadError> {
        debug!(program = %self.program, %step, interface, "Running reload step");

        let status = Command::new(&self.program)
            .arg(step.as_str())
            .arg(interface)
            .status()
            .await
            .map_err(|source| ReloadError::Spawn {
                program: self.program.clone(),
                step,
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ReloadError::Failed {
                program: self.program.clone(),
                step,
                status,
            })
        }
    }
}

impl Default for WgQuick {
    fn default() -> Self {
        Self::new("wg-quick")
    }
}

#[async_trait]
impl Reloader for WgQuick {
    async fn reload(&self, interface: &str) -> Result<(), ReloadError> {
        self.run_step(ReloadStep::Down, interface).await?;
        self.run_step(ReloadStep::Up, interface).await?;
        info!(interface, "WireGuard interface reloaded");
        Ok(())
    }
}
