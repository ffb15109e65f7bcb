//! Lineage error types.

use thiserror::Error;

/// Lineage result type.
pub type LineageResult<T> = Result<T, LineageError>;

/// Lineage errors.
#[derive(Error, Debug)]
pub enum LineageError {
    /// Store call failed.
    #[error("store error: {0}")]
    Store(#[from] lakegov_store::StoreError),

    /// A persisted record could not be parsed.
    #[error("corrupt lineage record {key}: {message}")]
    CorruptRecord {
        /// Object key of the record.
        key: String,
        /// Parse failure detail.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LineageError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(_) => "LINEAGE_STORE_ERROR",
            Self::CorruptRecord { .. } => "LINEAGE_CORRUPT_RECORD",
            Self::Serialization(_) => "LINEAGE_SERIALIZATION_ERROR",
        }
    }
}
