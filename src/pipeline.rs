//! One prune run: read, parse, filter, reconcile, write, reload
//!
//! Every read and every computation happens before the first write, so a
//! missing file, a malformed date or an unreadable ledger leaves both files
//! untouched. The ledger is written before the config, so a pruned peer is
//! on record before it leaves the config; the reload only runs once both
//! writes succeeded and its failure does not fail the run.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::ledger::{LedgerError, LedgerStore, ReconcileStats, reconcile, store as ledger_store};
use crate::peers::{self, Decision, ExpiryPolicy, ParseError, PeerBlock};
use crate::reload::Reloader;
use crate::storage::{self, StorageError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("WireGuard config: {0}")]
    Storage(#[from] StorageError),

    #[error("WireGuard config parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// Per-run switches
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Reference date for expiration
    pub today: NaiveDate,
    /// Compute and log only, write nothing
    pub dry_run: bool,
    /// Reload the interface after writing
    pub reload: bool,
}

/// A peer removed from the config
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrunedPeer {
    pub client_name: Option<String>,
    pub public_key: String,
    pub enrollment_date: NaiveDate,
    pub age_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "error", rename_all = "snake_case")]
pub enum ReloadOutcome {
    /// Dry run or reload disabled
    Skipped,
    Reloaded,
    Failed(String),
}

/// What a run did
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub blocks: usize,
    pub peers: usize,
    pub retained_peers: usize,
    pub pruned: Vec<PrunedPeer>,
    pub ledger: ReconcileStats,
    pub ledger_entries: usize,
    pub written: bool,
    pub reload: ReloadOutcome,
}

/// Per-peer view for `inspect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerSummary {
    pub block: usize,
    pub client_name: Option<String>,
    pub public_key: String,
    pub enrollment_date: Option<NaiveDate>,
    pub age_days: Option<i64>,
    pub decision: Decision,
}

/// Execute a full prune run
#[tracing::instrument(
    name = "prune",
    skip_all,
    fields(interface = %config.wireguard.interface, today = %options.today, dry_run = options.dry_run)
)]
pub async fn run(
    config: &Config,
    options: RunOptions,
    reloader: &dyn Reloader,
) -> Result<RunReport, RunError> {
    let config_path = &config.wireguard.config_path;
    let policy = ExpiryPolicy::new(options.today, config.threshold_days());
    let store = LedgerStore::new(&config.ledger.path);

    let text = storage::read_text(config_path)?;
    let blocks = peers::parse_blocks(&text)?;
    let mut ledger = store.load()?;

    let (retained, pruned) = peers::partition_expired(&blocks, &policy);
    let stats = reconcile(&mut ledger, &blocks, &policy);
    let rendered = peers::render_blocks(retained.iter().copied());
    let ledger_bytes = ledger_store::encode(&ledger)?;

    let pruned: Vec<PrunedPeer> = pruned
        .into_iter()
        .filter_map(|block| pruned_peer(block, &policy))
        .collect();
    for peer in &pruned {
        info!(
            client = peer.client_name.as_deref().unwrap_or(""),
            public_key = %peer.public_key,
            added_on = %peer.enrollment_date,
            age_days = peer.age_days,
            "Removing expired peer"
        );
    }

    let mut report = RunReport {
        blocks: blocks.len(),
        peers: blocks.iter().filter(|b| b.is_peer()).count(),
        retained_peers: retained.iter().filter(|b| b.is_peer()).count(),
        pruned,
        ledger: stats,
        ledger_entries: ledger.len(),
        written: false,
        reload: ReloadOutcome::Skipped,
    };

    if options.dry_run {
        info!(
            pruned = report.pruned.len(),
            "Dry run, leaving {} and {} untouched",
            config_path.display(),
            store.path().display()
        );
        return Ok(report);
    }

    store.write_encoded(&ledger_bytes)?;
    info!(entries = report.ledger_entries, "Peers ledger updated");

    storage::write_atomic(config_path, rendered.as_bytes())?;
    info!(pruned = report.pruned.len(), "Old peers removed from '{}'", config_path.display());
    report.written = true;

    if !options.reload {
        warn!("Reload disabled, interface keeps running the previous config");
        return Ok(report);
    }

    report.reload = match reloader.reload(&config.wireguard.interface).await {
        Ok(()) => ReloadOutcome::Reloaded,
        Err(e) => {
            error!(error = %e, "Error reloading WireGuard interface {}", config.wireguard.interface);
            ReloadOutcome::Failed(e.to_string())
        }
    };

    Ok(report)
}

/// Read and classify every peer without writing anything
pub fn inspect(config: &Config, today: NaiveDate) -> Result<Vec<PeerSummary>, RunError> {
    let text = storage::read_text(&config.wireguard.config_path)?;
    let blocks = peers::parse_blocks(&text)?;
    let policy = ExpiryPolicy::new(today, config.threshold_days());
    Ok(summarize(&blocks, &policy))
}

/// Summaries for the peer blocks, in config order
pub fn summarize(blocks: &[PeerBlock], policy: &ExpiryPolicy) -> Vec<PeerSummary> {
    blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| {
            let decision = policy.decide(block)?;
            let enrollment_date = block.enrollment_date();
            Some(PeerSummary {
                block: index,
                client_name: block.client_name().map(str::to_string),
                public_key: block.public_key()?.to_string(),
                enrollment_date,
                age_days: enrollment_date.map(|d| policy.age_in_days(d)),
                decision,
            })
        })
        .collect()
}

fn pruned_peer(block: &PeerBlock, policy: &ExpiryPolicy) -> Option<PrunedPeer> {
    let enrollment_date = block.enrollment_date()?;
    Some(PrunedPeer {
        client_name: block.client_name().map(str::to_string),
        public_key: block.public_key()?.to_string(),
        enrollment_date,
        age_days: policy.age_in_days(enrollment_date),
    })
}
