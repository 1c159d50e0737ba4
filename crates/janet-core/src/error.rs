use thiserror::Error;

/// Errors raised by the index.
///
/// Only construction can fail. Ingestion, removal and retrieval accept any
/// string input; an empty retrieval result is the "nothing found" signal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
