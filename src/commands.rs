use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::{error, info};

use wgprune::config::Config;
use wgprune::observability;
use wgprune::peers::Decision;
use wgprune::pipeline::{self, PeerSummary, RunOptions};
use wgprune::reload::WgQuick;

use crate::cli::{InspectArgs, PruneArgs};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn prune(settings: Option<PathBuf>, args: PruneArgs) -> Result<(), AnyError> {
    let config = Config::load_with_overrides(settings, |c| args.overrides.apply(c))?;
    observability::init_tracing(&config.logging)?;

    let options = RunOptions {
        today: args.today.unwrap_or_else(local_today),
        dry_run: args.dry_run,
        reload: config.reload.enabled && !args.no_reload,
    };
    let reloader = WgQuick::new(config.reload.program.clone());

    let report = match pipeline::run(&config, options, &reloader).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Prune run aborted, WireGuard config left unchanged");
            return Err(e.into());
        }
    };

    info!(
        peers = report.peers,
        retained = report.retained_peers,
        pruned = report.pruned.len(),
        ledger_created = report.ledger.created,
        ledger_changed = report.ledger.status_changed,
        ledger_entries = report.ledger_entries,
        written = report.written,
        reload = ?report.reload,
        "Prune run complete"
    );

    Ok(())
}

pub fn inspect(settings: Option<PathBuf>, args: InspectArgs) -> Result<(), AnyError> {
    let config = Config::load_with_overrides(settings, |c| args.overrides.apply(c))?;
    observability::init_tracing(&config.logging)?;

    let today = args.today.unwrap_or_else(local_today);
    let peers = pipeline::inspect(&config, today)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&peers)?);
    } else {
        print_table(&peers, today, config.threshold_days());
    }
    Ok(())
}

pub fn settings(settings: Option<PathBuf>) -> Result<(), AnyError> {
    let config = Config::load(settings)?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn print_table(peers: &[PeerSummary], today: NaiveDate, threshold_days: u32) {
    println!("today {today}, threshold {threshold_days} days");
    println!(
        "{:<24} {:<46} {:<10} {:>6}  {}",
        "CLIENT", "PUBLIC KEY", "ADDED ON", "AGE", "ACTION"
    );
    for peer in peers {
        let added_on = peer
            .enrollment_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let age = peer
            .age_days
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let action = match peer.decision {
            Decision::Retain => "keep",
            Decision::Prune => "prune",
            Decision::Exempt => "keep (no date)",
        };
        println!(
            "{:<24} {:<46} {:<10} {:>6}  {}",
            peer.client_name.as_deref().unwrap_or("-"),
            peer.public_key,
            added_on,
            age,
            action
        );
    }
}
