//! WireGuard configuration peer blocks
//!
//! A WireGuard config file is treated as an ordered sequence of text blocks
//! separated by a blank line. Each block is either a peer (it carries a
//! `PublicKey = ...` line) or something else, typically the `[Interface]`
//! preamble, which is passed through untouched.
//!
//! Three comment markers written by the enrollment tooling are recognised
//! inside a block:
//!
//! ```text
//! ### Client alice
//! # Added on: 2024-02-15
//! [Peer]
//! PublicKey = 3cjc1Q2T9bPvmLkzUq0bVf8Yh2yY9W5p9Zr2b7Yxk0c=
//! AllowedIPs = 10.66.66.2/32
//! ```
//!
//! ## Pipeline
//!
//! - [`parse_blocks`] splits text into [`PeerBlock`]s
//! - [`ExpiryPolicy`] decides which peers are past the threshold
//! - [`render_blocks`] joins the retained blocks back into text
//!
//! `render_blocks(&parse_blocks(text)?)` reproduces `text` byte-for-byte.

pub mod block;
pub mod error;
pub mod filter;
pub mod rewrite;

pub use block::{PeerBlock, parse_blocks};
pub use error::ParseError;
pub use filter::{Decision, ExpiryPolicy, partition_expired, retain_unexpired};
pub use rewrite::render_blocks;

/// Separator between blocks, both for splitting and for rejoining
pub const BLOCK_DELIMITER: &str = "\n\n";

/// Date format used by the `# Added on:` marker and the ledger
pub const DATE_FORMAT: &str = "%Y-%m-%d";
