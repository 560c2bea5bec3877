/// Merge parsed peers into the ledger
use serde::Serialize;
use tracing::{debug, info};

use super::entry::{Ledger, LedgerEntry, PeerStatus};
use crate::peers::{ExpiryPolicy, PeerBlock};

/// Reconciliation statistics
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// New entries appended
    pub created: usize,
    /// Existing entries whose status flipped
    pub status_changed: usize,
    /// Existing entries seen again with the same status
    pub unchanged: usize,
    /// Peer blocks skipped for lack of a client name or enrollment date
    pub skipped: usize,
}

/// Reconcile the full (unfiltered) block list into `ledger`
///
/// Only peers carrying a public key, client name and enrollment date take
/// part. Known keys get their status refreshed; unknown keys are appended.
/// Entries are never removed.
pub fn reconcile<'a, I>(ledger: &mut Ledger, blocks: I, policy: &ExpiryPolicy) -> ReconcileStats
where
    I: IntoIterator<Item = &'a PeerBlock>,
{
    let mut stats = ReconcileStats::default();

    for block in blocks {
        let Some(public_key) = block.public_key() else {
            continue;
        };
        let (Some(client_name), Some(enrollment_date)) =
            (block.client_name(), block.enrollment_date())
        else {
            debug!(public_key, "Peer lacks client name or enrollment date, not ledgered");
            stats.skipped += 1;
            continue;
        };

        let status = if policy.is_expired(enrollment_date) {
            PeerStatus::Expired
        } else {
            PeerStatus::Active
        };

        match ledger.set_status(public_key, status) {
            Some(previous) if previous != status => {
                info!(client = client_name, public_key, from = %previous, to = %status, "Ledger status changed");
                stats.status_changed += 1;
            }
            Some(_) => stats.unchanged += 1,
            None => {
                let entry = LedgerEntry::new(client_name, public_key, enrollment_date, status);
                // Key was just checked to be absent.
                let _ = ledger.insert(entry);
                info!(client = client_name, public_key, %status, "New ledger entry");
                stats.created += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::{DATE_FORMAT, parse_blocks, retain_unexpired};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn policy(today: &str) -> ExpiryPolicy {
        ExpiryPolicy::new(date(today), 30)
    }

    fn peer(name: &str, key: &str, added_on: &str) -> String {
        format!("### Client {name}\n# Added on: {added_on}\n[Peer]\nPublicKey = {key}")
    }

    fn config(peers: &[String]) -> Vec<PeerBlock> {
        let mut parts = vec!["[Interface]\nAddress = 10.0.0.1/24".to_string()];
        parts.extend_from_slice(peers);
        parse_blocks(&parts.join("\n\n")).unwrap()
    }

    #[test]
    fn test_creates_entries_with_status() {
        let blocks = config(&[
            peer("old", "k-old", "2024-01-01"),
            peer("new", "k-new", "2024-02-15"),
        ]);
        let mut ledger = Ledger::new();

        let stats = reconcile(&mut ledger, &blocks, &policy("2024-03-01"));

        assert_eq!(stats.created, 2);
        assert_eq!(ledger.get("k-old").unwrap().status(), PeerStatus::Expired);
        assert_eq!(ledger.get("k-new").unwrap().status(), PeerStatus::Active);
        assert_eq!(
            ledger.get("k-new").unwrap().enrollment_date(),
            date("2024-02-15")
        );
    }

    #[test]
    fn test_boundary_matches_filter() {
        let blocks = config(&[
            peer("edge", "k-edge", "2024-01-31"),
            peer("past", "k-past", "2024-01-30"),
        ]);
        let policy = policy("2024-03-01");
        let mut ledger = Ledger::new();

        reconcile(&mut ledger, &blocks, &policy);
        let retained = retain_unexpired(&blocks, &policy);

        assert_eq!(ledger.get("k-edge").unwrap().status(), PeerStatus::Active);
        assert_eq!(ledger.get("k-past").unwrap().status(), PeerStatus::Expired);
        for block in blocks.iter().filter(|b| b.is_peer()) {
            let key = block.public_key().unwrap();
            let kept = retained.iter().any(|r| r.public_key() == Some(key));
            let active = ledger.get(key).unwrap().status() == PeerStatus::Active;
            assert_eq!(kept, active, "filter and ledger disagree on {key}");
        }
    }

    #[test]
    fn test_second_run_only_updates_status() {
        let blocks = config(&[peer("alice", "ka", "2024-02-15")]);
        let mut ledger = Ledger::new();

        let first = reconcile(&mut ledger, &blocks, &policy("2024-03-01"));
        assert_eq!(first.created, 1);

        let again = reconcile(&mut ledger, &blocks, &policy("2024-03-01"));
        assert_eq!(again.created, 0);
        assert_eq!(again.unchanged, 1);

        let later = reconcile(&mut ledger, &blocks, &policy("2024-04-01"));
        assert_eq!(later.status_changed, 1);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("ka").unwrap().status(), PeerStatus::Expired);
    }

    #[test]
    fn test_existing_name_and_date_are_immutable() {
        let mut ledger = Ledger::from_entries([LedgerEntry::new(
            "original",
            "ka",
            date("2024-02-01"),
            PeerStatus::Active,
        )]);
        let blocks = config(&[peer("renamed", "ka", "2023-01-01")]);

        reconcile(&mut ledger, &blocks, &policy("2024-03-01"));

        let entry = ledger.get("ka").unwrap();
        assert_eq!(entry.client_name(), "original");
        assert_eq!(entry.enrollment_date(), date("2024-02-01"));
        // Status follows the date found in the config
        assert_eq!(entry.status(), PeerStatus::Expired);
    }

    #[test]
    fn test_entries_for_removed_peers_are_kept() {
        let mut ledger = Ledger::new();
        reconcile(
            &mut ledger,
            &config(&[peer("gone", "kg", "2024-01-01")]),
            &policy("2024-03-01"),
        );

        let stats = reconcile(&mut ledger, &config(&[]), &policy("2024-03-02"));

        assert_eq!(stats, ReconcileStats::default());
        assert!(ledger.contains("kg"));
    }

    #[test]
    fn test_incomplete_peers_are_skipped() {
        let blocks = config(&[
            "# Added on: 2024-02-15\n[Peer]\nPublicKey = no-name".to_string(),
            "### Client nodate\n[Peer]\nPublicKey = no-date".to_string(),
            "### Client nokey\n# Added on: 2024-02-15\n[Peer]".to_string(),
        ]);
        let mut ledger = Ledger::new();

        let stats = reconcile(&mut ledger, &blocks, &policy("2024-03-01"));

        assert!(ledger.is_empty());
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.created, 0);
    }

    #[test]
    fn test_repeated_key_in_one_config_yields_one_entry() {
        let blocks = config(&[
            peer("alice", "ka", "2024-02-15"),
            peer("alice-copy", "ka", "2024-02-20"),
        ]);
        let mut ledger = Ledger::new();

        let stats = reconcile(&mut ledger, &blocks, &policy("2024-03-01"));

        assert_eq!(ledger.len(), 1);
        assert_eq!(stats.created, 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(ledger.get("ka").unwrap().client_name(), "alice");
    }
}
