use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wgprune::config::{Config, Days};

#[derive(Parser, Debug)]
#[command(name = "wgprune")]
#[command(about = "Prune expired WireGuard peers and keep an audit ledger", long_about = None)]
pub struct Cli {
    /// TOML settings file (defaults to $WGPRUNE_CONFIG or config/wgprune.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove expired peers, update the ledger and reload the interface
    Prune(PruneArgs),
    /// Show every peer with its age and what a prune run would do
    Inspect(InspectArgs),
    /// Print the effective settings as TOML
    Settings,
}

/// Overrides for values normally taken from the settings file
#[derive(clap::Args, Debug)]
pub struct OverrideArgs {
    /// WireGuard config file
    #[arg(long, value_name = "PATH")]
    pub wg_config: Option<PathBuf>,

    /// Ledger CSV file
    #[arg(long, value_name = "PATH")]
    pub ledger: Option<PathBuf>,

    /// Interface to reload
    #[arg(long)]
    pub interface: Option<String>,

    /// Maximum peer age, e.g. 30, 30d, 4w
    #[arg(long, value_name = "DAYS")]
    pub threshold: Option<Days>,
}

impl OverrideArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.wg_config {
            config.wireguard.config_path = path.clone();
        }
        if let Some(path) = &self.ledger {
            config.ledger.path = path.clone();
        }
        if let Some(interface) = &self.interface {
            config.wireguard.interface = interface.clone();
        }
        if let Some(threshold) = self.threshold {
            config.expiration.threshold = threshold;
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct PruneArgs {
    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Reference date instead of the local date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Log what would change without writing or reloading
    #[arg(long)]
    pub dry_run: bool,

    /// Write files but skip the interface reload
    #[arg(long)]
    pub no_reload: bool,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Reference date instead of the local date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
