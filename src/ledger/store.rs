use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::entry::{Ledger, LedgerEntry};
use super::error::Result;
use crate::storage;

/// CSV column names, in order
pub const HEADER: [&str; 4] = ["ClientName", "PublicKey", "AddedOn", "Status"];

/// CSV-backed ledger file
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger, or an empty one if the file does not exist yet
    pub fn load(&self) -> Result<Ledger> {
        match storage::read_text_if_exists(&self.path)? {
            Some(text) => {
                let ledger = decode(&text)?;
                info!(
                    path = %self.path.display(),
                    entries = ledger.len(),
                    "Loaded ledger"
                );
                Ok(ledger)
            }
            None => {
                info!(path = %self.path.display(), "No ledger yet, starting empty");
                Ok(Ledger::new())
            }
        }
    }

    /// Atomically replace the ledger file
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let bytes = encode(ledger)?;
        self.write_encoded(&bytes)
    }

    /// Write bytes previously produced by [`encode`]
    pub fn write_encoded(&self, bytes: &[u8]) -> Result<()> {
        storage::write_atomic(&self.path, bytes)?;
        debug!(path = %self.path.display(), "Saved ledger");
        Ok(())
    }
}

/// Parse ledger CSV text
pub fn decode(text: &str) -> Result<Ledger> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let entries = reader
        .deserialize::<LedgerEntry>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Ledger::from_entries(entries))
}

/// Serialize a ledger to CSV, header row included even when empty
pub fn encode(ledger: &Ledger) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for entry in ledger.iter() {
        writer.serialize(entry)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()).into())
}
