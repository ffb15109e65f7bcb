//! Policy deployment error types.

use thiserror::Error;

/// Policy result type.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Policy deployment errors.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// Missing or malformed policy configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Catalog call failed; the deploy is aborted with no rollback.
    #[error("catalog error: {0}")]
    Catalog(#[from] lakegov_catalog::CatalogError),
}

impl PolicyError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "POLICY_CONFIG_ERROR",
            Self::Catalog(_) => "POLICY_CATALOG_ERROR",
        }
    }
}
