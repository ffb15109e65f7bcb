//! Batch job error types.

use thiserror::Error;

/// Job result type.
pub type JobResult<T> = Result<T, JobError>;

/// Batch job errors.
#[derive(Error, Debug)]
pub enum JobError {
    /// Missing or malformed job configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Frame error (CSV parse, unknown column).
    #[error("frame error: {0}")]
    Core(#[from] lakegov_core::CoreError),

    /// Quality rule error.
    #[error("quality error: {0}")]
    Quality(#[from] lakegov_quality::QualityError),

    /// Lineage recording failed.
    #[error("lineage error: {0}")]
    Lineage(#[from] lakegov_lineage::LineageError),

    /// Store call failed.
    #[error("store error: {0}")]
    Store(#[from] lakegov_store::StoreError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JobError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "JOB_CONFIG_ERROR",
            Self::Core(_) => "JOB_FRAME_ERROR",
            Self::Quality(_) => "JOB_QUALITY_ERROR",
            Self::Lineage(_) => "JOB_LINEAGE_ERROR",
            Self::Store(_) => "JOB_STORE_ERROR",
            Self::Serialization(_) => "JOB_SERIALIZATION_ERROR",
        }
    }
}
