pub mod config;
pub mod humanize;
pub mod ledger;
pub mod observability;
pub mod peers;
pub mod pipeline;
pub mod reload;
pub mod storage;
