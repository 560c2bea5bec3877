/// Peer block parsing
use chrono::NaiveDate;

use super::error::{ParseError, Result};
use super::{BLOCK_DELIMITER, DATE_FORMAT};

const PUBLIC_KEY_LABEL: &str = "PublicKey";
const ADDED_ON_MARKER: &str = "# Added on:";
const CLIENT_MARKER: &str = "### Client ";

/// One blank-line separated unit of a WireGuard config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerBlock {
    raw: String,
    public_key: Option<String>,
    client_name: Option<String>,
    enrollment_date: Option<NaiveDate>,
}

impl PeerBlock {
    /// Parse a single block. `index` is only used for error reporting.
    pub fn parse(index: usize, raw: &str) -> Result<Self> {
        let enrollment_date = match find_added_on(raw) {
            Some(value) => Some(parse_enrollment_date(value).ok_or_else(|| {
                ParseError::InvalidDate {
                    block: index,
                    value: value.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            raw: raw.to_string(),
            public_key: find_public_key(raw),
            client_name: find_client_name(raw),
            enrollment_date,
        })
    }

    /// Block text exactly as it appeared in the file
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    pub fn enrollment_date(&self) -> Option<NaiveDate> {
        self.enrollment_date
    }

    /// True for blocks that describe a peer (they carry a public key)
    pub fn is_peer(&self) -> bool {
        self.public_key.is_some()
    }
}

/// Split config text into blocks on the blank-line delimiter
///
/// Fails on the first block whose `# Added on:` value is not a valid
/// `YYYY-MM-DD` date; no partial result is returned.
pub fn parse_blocks(text: &str) -> Result<Vec<PeerBlock>> {
    text.split(BLOCK_DELIMITER)
        .enumerate()
        .map(|(index, raw)| PeerBlock::parse(index, raw))
        .collect()
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}

/// First `PublicKey = <token>` occurrence anywhere in the block
fn find_public_key(raw: &str) -> Option<String> {
    let mut rest = raw;
    while let Some(pos) = rest.find(PUBLIC_KEY_LABEL) {
        rest = &rest[pos + PUBLIC_KEY_LABEL.len()..];
        if let Some(value) = rest.trim_start().strip_prefix('=') {
            let value = value.trim_start();
            let end = value.find(|c| !is_key_char(c)).unwrap_or(value.len());
            if end > 0 {
                return Some(value[..end].to_string());
            }
        }
    }
    None
}

/// Raw token following the first `# Added on:` marker
fn find_added_on(raw: &str) -> Option<&str> {
    let pos = raw.find(ADDED_ON_MARKER)?;
    let value = raw[pos + ADDED_ON_MARKER.len()..].trim_start_matches([' ', '\t']);
    let end = value.find(char::is_whitespace).unwrap_or(value.len());
    Some(&value[..end])
}

fn find_client_name(raw: &str) -> Option<String> {
    raw.lines().find_map(|line| {
        let pos = line.find(CLIENT_MARKER)?;
        let name = line[pos + CLIENT_MARKER.len()..].trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// Leading `YYYY-MM-DD` of the token: zero padded, and a real calendar date.
/// Anything after the tenth character (`T10:00`, a stray comma) is ignored.
fn parse_enrollment_date(value: &str) -> Option<NaiveDate> {
    let prefix = value.get(..10)?;
    let shaped = prefix.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}
