use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Peer status as recorded in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerStatus {
    Active,
    Expired,
}

impl PeerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeerStatus::Active => "active",
            PeerStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for PeerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ledger row
///
/// Field order here is the CSV column order. Name, key and enrollment date
/// are fixed at creation; only the status is mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(rename = "ClientName")]
    client_name: String,
    #[serde(rename = "PublicKey")]
    public_key: String,
    #[serde(rename = "AddedOn")]
    enrollment_date: NaiveDate,
    #[serde(rename = "Status")]
    status: PeerStatus,
}

impl LedgerEntry {
    pub fn new(
        client_name: impl Into<String>,
        public_key: impl Into<String>,
        enrollment_date: NaiveDate,
        status: PeerStatus,
    ) -> Self {
        let client_name: String = client_name.into();
        Self {
            client_name: client_name.trim().to_string(),
            public_key: public_key.into(),
            enrollment_date,
            status,
        }
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn enrollment_date(&self) -> NaiveDate {
        self.enrollment_date
    }

    pub fn status(&self) -> PeerStatus {
        self.status
    }
}

/// Ledger entries in file order, unique by public key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    index: HashMap<String, usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from rows; later rows repeating a public key are dropped
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = LedgerEntry>,
    {
        let mut ledger = Self::new();
        for entry in entries {
            if let Err(duplicate) = ledger.insert(entry) {
                warn!(
                    public_key = duplicate.public_key(),
                    client = duplicate.client_name(),
                    "Dropping duplicate ledger row"
                );
            }
        }
        ledger
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, public_key: &str) -> Option<&LedgerEntry> {
        self.index.get(public_key).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, public_key: &str) -> bool {
        self.index.contains_key(public_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    /// Number of entries with the given status
    pub fn count(&self, status: PeerStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Append a new entry; hands the entry back if its key is already present
    pub fn insert(&mut self, entry: LedgerEntry) -> Result<(), LedgerEntry> {
        if self.index.contains_key(&entry.public_key) {
            return Err(entry);
        }
        self.index
            .insert(entry.public_key.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Update the status of an existing entry, returning the previous status
    pub fn set_status(&mut self, public_key: &str, status: PeerStatus) -> Option<PeerStatus> {
        let i = *self.index.get(public_key)?;
        Some(std::mem::replace(&mut self.entries[i].status, status))
    }
}
