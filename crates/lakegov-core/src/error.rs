//! Core error types.

use thiserror::Error;

/// Core result type.
pub type CoreResult<T> = Result<T, CoreError>;

/// Core errors.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Row arity does not match the frame's columns.
    #[error("row has {actual} cells, frame has {expected} columns")]
    RowArity { expected: usize, actual: usize },

    /// Column not present in the frame.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// CSV parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CORE_CONFIG_ERROR",
            Self::RowArity { .. } => "CORE_ROW_ARITY",
            Self::UnknownColumn(_) => "CORE_UNKNOWN_COLUMN",
            Self::Csv(_) => "CORE_CSV_ERROR",
            Self::Io(_) => "CORE_IO_ERROR",
            Self::Serialization(_) => "CORE_SERIALIZATION_ERROR",
        }
    }
}
