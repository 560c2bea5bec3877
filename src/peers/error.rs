use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("block {block}: invalid enrollment date {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { block: usize, value: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;
