//! Error types for addrtree

use thiserror::Error;

/// Result type alias for addrtree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in addrtree operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot query a prefix that isn't on a nybble boundary (mask size was {bits})")]
    UnalignedPrefix { bits: u8 },

    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),

    #[error("Invalid address on line {line}: {value:?}")]
    InvalidAddress { line: usize, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tree file: {0}")]
    InvalidFile(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Address family mismatch: expected {expected}, found {found}")]
    FamilyMismatch { expected: String, found: String },

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Structural defect at depth {depth} (path {path})")]
    StructuralDefect { depth: usize, path: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error came out of saving or loading a snapshot
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Serialization(_)
                | Error::InvalidFile(_)
                | Error::VersionMismatch { .. }
                | Error::FamilyMismatch { .. }
                | Error::Corruption(_)
        )
    }
}
