//! Quality engine error types.

use thiserror::Error;

/// Quality result type.
pub type QualityResult<T> = Result<T, QualityError>;

/// Quality engine errors.
#[derive(Error, Debug)]
pub enum QualityError {
    /// Validation was invoked before a rule suite was armed.
    #[error("no rule suite configured; arm the engine before validating")]
    SuiteNotConfigured,

    /// Missing or malformed rule configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A rule's pattern failed to compile.
    #[error("invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Store call failed while persisting a report.
    #[error("store error: {0}")]
    Store(#[from] lakegov_store::StoreError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QualityError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SuiteNotConfigured => "QUALITY_SUITE_NOT_CONFIGURED",
            Self::Configuration(_) => "QUALITY_CONFIG_ERROR",
            Self::Pattern(_) => "QUALITY_INVALID_PATTERN",
            Self::Store(_) => "QUALITY_STORE_ERROR",
            Self::Serialization(_) => "QUALITY_SERIALIZATION_ERROR",
        }
    }
}
