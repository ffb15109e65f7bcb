//! Catalog client trait and call shapes.

use crate::CatalogResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Table parameter map, persisted on the catalog table entry.
pub type TableParameters = HashMap<String, String>;

/// Builds an IAM-style role ARN for a role in the caller's account.
#[must_use]
pub fn role_arn(account_id: &str, role: &str) -> String {
    format!("arn:aws:iam::{account_id}:role/{role}")
}

/// A database to create in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInput {
    /// Database name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Storage location URI.
    pub location: Option<String>,
}

impl DatabaseInput {
    /// Creates a new database input.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            location: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the storage location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// The resource a grant applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    /// A whole database.
    Database {
        /// Database name.
        name: String,
    },
    /// A table in a database.
    Table {
        /// Database name.
        database: String,
        /// Table name.
        name: String,
    },
}

/// A permission grant to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Principal, always an IAM-style role ARN.
    pub principal: String,
    /// Target resource.
    pub resource: Resource,
    /// Permission names (e.g. `SELECT`, `ALTER`).
    pub permissions: Vec<String>,
    /// Columns the principal may NOT see; `None` means no column scoping.
    pub excluded_columns: Option<Vec<String>>,
    /// Named row filter the grant is scoped to, if any.
    pub row_filter: Option<String>,
}

impl Grant {
    /// Creates a grant.
    pub fn new(
        principal: impl Into<String>,
        resource: Resource,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            principal: principal.into(),
            resource,
            permissions: permissions.into_iter().map(Into::into).collect(),
            excluded_columns: None,
            row_filter: None,
        }
    }

    /// Creates a SELECT grant.
    pub fn select(principal: impl Into<String>, resource: Resource) -> Self {
        Self::new(principal, resource, ["SELECT"])
    }

    /// Excludes columns from the grant.
    #[must_use]
    pub fn with_excluded_columns(
        mut self,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.excluded_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Scopes the grant to a named row filter.
    #[must_use]
    pub fn with_row_filter(mut self, name: impl Into<String>) -> Self {
        self.row_filter = Some(name.into());
        self
    }
}

/// A named row-filter predicate on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFilterInput {
    /// Database of the filtered table.
    pub database: String,
    /// Filtered table.
    pub table: String,
    /// Filter name.
    pub name: String,
    /// Filter predicate expression.
    pub filter_expression: String,
}

/// Narrow seam in front of the managed catalog/security service.
///
/// Implementations make blocking service calls with no retry or timeout
/// handling; failures propagate to the caller as
/// [`CatalogError`](crate::CatalogError)s.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Returns the client name.
    fn name(&self) -> &str;

    /// Returns the caller's account id, used to resolve role ARNs.
    async fn account_id(&self) -> CatalogResult<String>;

    /// Creates a database; fails with `AlreadyExists` on a duplicate name.
    async fn create_database(&self, input: &DatabaseInput) -> CatalogResult<()>;

    /// Reads the full parameter map of a table.
    async fn get_table_parameters(
        &self,
        database: &str,
        table: &str,
    ) -> CatalogResult<TableParameters>;

    /// Replaces the full parameter map of a table.
    async fn update_table_parameters(
        &self,
        database: &str,
        table: &str,
        parameters: TableParameters,
    ) -> CatalogResult<()>;

    /// Issues a permission grant.
    async fn grant_permissions(&self, grant: &Grant) -> CatalogResult<()>;

    /// Creates a named row-filter predicate.
    async fn create_row_filter(&self, input: &RowFilterInput) -> CatalogResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_arn() {
        assert_eq!(
            role_arn("123456789012", "analyst"),
            "arn:aws:iam::123456789012:role/analyst"
        );
    }

    #[test]
    fn test_grant_builders() {
        let grant = Grant::select(
            "arn:aws:iam::1:role/r",
            Resource::Table {
                database: "db".into(),
                name: "t".into(),
            },
        )
        .with_excluded_columns(["ssn"]);

        assert_eq!(grant.permissions, vec!["SELECT"]);
        assert_eq!(grant.excluded_columns, Some(vec!["ssn".to_string()]));
        assert!(grant.row_filter.is_none());
    }
}
