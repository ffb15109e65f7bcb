//! Catalog/security-service collaborator for the lakegov toolkit.
//!
//! The [`CatalogClient`] trait is the narrow seam in front of the managed
//! catalog and its permission layer: database creation, table parameter
//! read-modify-write, permission grants, and row-filter creation. Components
//! take the client by constructor injection so tests run against
//! [`InMemoryCatalog`] and production runs against the AWS implementation.

pub mod aws;
pub mod client;
pub mod error;
pub mod memory;

pub use client::{
    role_arn, CatalogClient, DatabaseInput, Grant, Resource, RowFilterInput, TableParameters,
};
pub use error::{CatalogError, CatalogResult};
pub use memory::InMemoryCatalog;
