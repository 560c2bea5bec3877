/// Peer audit ledger
///
/// The ledger records every peer that has ever been seen in the WireGuard
/// config together with its enrollment date and current status. It is an
/// append/update-only trail: entries are created the first time a peer is
/// seen with a name, key and enrollment date, afterwards only their status
/// changes, and they are never removed, even when the peer itself is pruned
/// from the live config.
///
/// ## Storage
///
/// The ledger is persisted as CSV with a fixed header:
///
/// ```text
/// ClientName,PublicKey,AddedOn,Status
/// alice,3cjc1Q2T9bPvmLkzUq0bVf8Yh2yY9W5p9Zr2b7Yxk0c=,2024-02-15,active
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use wgprune::ledger::{LedgerStore, reconcile};
///
/// let store = LedgerStore::new("peers.csv");
/// let mut ledger = store.load()?;
/// let stats = reconcile(&mut ledger, &blocks, &policy);
/// store.save(&ledger)?;
/// ```

pub mod entry;
pub mod error;
pub mod reconcile;
pub mod store;

pub use entry::{Ledger, LedgerEntry, PeerStatus};
pub use error::{LedgerError, Result};
pub use reconcile::{ReconcileStats, reconcile};
pub use store::LedgerStore;
