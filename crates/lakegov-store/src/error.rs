//! Object-store error types.

use thiserror::Error;

/// Object-store result type.
pub type StoreResult<T> = Result<T, StoreError>;

/// Object-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Object not found.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Key is not usable by this backend.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Backend/service error.
    #[error("backend error: {0}")]
    Backend(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "STORE_NOT_FOUND",
            Self::InvalidKey(_) => "STORE_INVALID_KEY",
            Self::Backend(_) => "STORE_BACKEND_ERROR",
            Self::Configuration(_) => "STORE_CONFIG_ERROR",
            Self::Io(_) => "STORE_IO_ERROR",
        }
    }
}
