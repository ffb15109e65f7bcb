//! Classification error types.

use thiserror::Error;

/// Classification result type.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Classification errors.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Missing or malformed configuration; raised at construction time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A configured pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Catalog call failed while persisting classifications.
    #[error("catalog error: {0}")]
    Catalog(#[from] lakegov_catalog::CatalogError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClassifyError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CLASSIFY_CONFIG_ERROR",
            Self::Pattern(_) => "CLASSIFY_INVALID_PATTERN",
            Self::Catalog(_) => "CLASSIFY_CATALOG_ERROR",
            Self::Serialization(_) => "CLASSIFY_SERIALIZATION_ERROR",
        }
    }
}
