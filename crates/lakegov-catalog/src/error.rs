//! Catalog error types.

use thiserror::Error;

/// Catalog result type.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The entity already exists (e.g. duplicate database name).
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The entity was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Service call failed.
    #[error("catalog service error: {0}")]
    Service(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl CatalogError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyExists(_) => "CATALOG_ALREADY_EXISTS",
            Self::NotFound(_) => "CATALOG_NOT_FOUND",
            Self::Service(_) => "CATALOG_SERVICE_ERROR",
            Self::Configuration(_) => "CATALOG_CONFIG_ERROR",
        }
    }
}
