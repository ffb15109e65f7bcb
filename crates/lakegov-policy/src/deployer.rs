//! Policy deployer.

use crate::config::{
    ColumnFilterPolicy, DatabasePolicy, PolicyConfig, RowFilterPolicy, TablePolicy,
};
use crate::{PolicyError, PolicyResult};
use lakegov_catalog::{
    role_arn, CatalogClient, DatabaseInput, Grant, Resource, RowFilterInput,
};
use std::sync::Arc;

/// Counters describing what a deploy applied before finishing (or failing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeploySummary {
    /// Databases created.
    pub databases_created: usize,
    /// Grants issued.
    pub grants_issued: usize,
    /// Row filters created.
    pub row_filters_created: usize,
}

/// Deploys a [`PolicyConfig`] against a catalog client.
pub struct PolicyDeployer {
    catalog: Arc<dyn CatalogClient>,
}

impl PolicyDeployer {
    /// Creates a deployer over the given catalog client.
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Deploys the whole document in declared order.
    ///
    /// Any failing step aborts the deploy; grants already issued are NOT
    /// rolled back, so each step logs its database/table/role context for
    /// manual reconciliation.
    pub async fn deploy(&self, config: &PolicyConfig) -> PolicyResult<DeploySummary> {
        let account = self.catalog.account_id().await?;
        let mut summary = DeploySummary::default();

        for database in &config.databases {
            self.create_database(database).await?;
            summary.databases_created += 1;
            summary.grants_issued += self.grant_database_permissions(&account, database).await?;
        }

        for table in &config.tables {
            summary.grants_issued += self.apply_table_permissions(&account, table).await?;
        }

        for filter in &config.row_filters {
            summary.grants_issued += self.apply_row_filter(&account, filter, config).await?;
            summary.row_filters_created += 1;
        }

        for filter in &config.column_filters {
            summary.grants_issued += self.apply_column_filter(&account, filter, config).await?;
        }

        tracing::info!(
            databases = summary.databases_created,
            grants = summary.grants_issued,
            row_filters = summary.row_filters_created,
            "policy deploy complete"
        );
        Ok(summary)
    }

    /// Creates one database. Duplicate names fail loudly; the external
    /// service's create is not idempotent and neither is this.
    async fn create_database(&self, database: &DatabasePolicy) -> PolicyResult<()> {
        let mut input = DatabaseInput::new(&database.name);
        if let Some(ref description) = database.description {
            input = input.with_description(description);
        }
        if let Some(ref location) = database.location {
            input = input.with_location(location);
        }

        self.catalog.create_database(&input).await.map_err(|e| {
            tracing::error!(database = %database.name, "failed to create database: {e}");
            PolicyError::from(e)
        })?;
        tracing::info!(database = %database.name, "created database");
        Ok(())
    }

    async fn grant_database_permissions(
        &self,
        account: &str,
        database: &DatabasePolicy,
    ) -> PolicyResult<usize> {
        let mut issued = 0;
        for permission in &database.permissions {
            let grant = Grant::new(
                role_arn(account, &permission.role),
                Resource::Database {
                    name: database.name.clone(),
                },
                permission.permissions(),
            );
            self.catalog.grant_permissions(&grant).await.map_err(|e| {
                tracing::error!(
                    database = %database.name,
                    role = %permission.role,
                    "failed to grant database permissions: {e}"
                );
                PolicyError::from(e)
            })?;
            tracing::info!(
                database = %database.name,
                role = %permission.role,
                access = %permission.access,
                "granted database permissions"
            );
            issued += 1;
        }
        Ok(issued)
    }

    /// Grants per-column SELECT: each access entry may see exactly its
    /// column, expressed as an exclusion list covering all other columns.
    async fn apply_table_permissions(
        &self,
        account: &str,
        table: &TablePolicy,
    ) -> PolicyResult<usize> {
        let mut issued = 0;
        for column in &table.columns {
            let excluded: Vec<String> = table
                .columns
                .iter()
                .filter(|c| c.name != column.name)
                .map(|c| c.name.clone())
                .collect();

            for access in &column.access {
                let grant = Grant::select(
                    role_arn(account, &access.role),
                    Resource::Table {
                        database: table.database.clone(),
                        name: table.name.clone(),
                    },
                )
                .with_excluded_columns(excluded.clone());

                self.catalog.grant_permissions(&grant).await.map_err(|e| {
                    tracing::error!(
                        database = %table.database,
                        table = %table.name,
                        column = %column.name,
                        role = %access.role,
                        "failed to grant column access: {e}"
                    );
                    PolicyError::from(e)
                })?;
                tracing::info!(
                    table = %table.name,
                    column = %column.name,
                    role = %access.role,
                    level = access.level.as_deref().unwrap_or("select"),
                    "granted column access"
                );
                issued += 1;
            }
        }
        Ok(issued)
    }

    /// Creates a named row-filter predicate on its declared table, then
    /// grants SELECT scoped to the filter for each listed role.
    async fn apply_row_filter(
        &self,
        account: &str,
        filter: &RowFilterPolicy,
        config: &PolicyConfig,
    ) -> PolicyResult<usize> {
        let database = filter
            .database
            .clone()
            .or_else(|| config.settings.default_database.clone())
            .ok_or_else(|| {
                PolicyError::Configuration(format!(
                    "row filter '{}' has no database and no default_database is set",
                    filter.name
                ))
            })?;

        let input = RowFilterInput {
            database: database.clone(),
            table: filter.table.clone(),
            name: filter.name.clone(),
            filter_expression: filter.filter_expression.clone(),
        };
        self.catalog.create_row_filter(&input).await.map_err(|e| {
            tracing::error!(
                database = %database,
                table = %filter.table,
                filter = %filter.name,
                "failed to create row filter: {e}"
            );
            PolicyError::from(e)
        })?;

        let mut issued = 0;
        for role in &filter.roles {
            let grant = Grant::select(
                role_arn(account, role),
                Resource::Table {
                    database: database.clone(),
                    name: filter.table.clone(),
                },
            )
            .with_row_filter(&filter.name);

            self.catalog.grant_permissions(&grant).await.map_err(|e| {
                tracing::error!(
                    table = %filter.table,
                    filter = %filter.name,
                    role = %role,
                    "failed to grant filtered access: {e}"
                );
                PolicyError::from(e)
            })?;
            issued += 1;
        }
        tracing::info!(
            filter = %filter.name,
            roles = filter.roles.len(),
            "created row filter"
        );
        Ok(issued)
    }

    /// Grants SELECT with exactly one excluded column per column/role pair:
    /// the principal may see everything except that column. This is the
    /// inverse direction from the table-permission case above.
    async fn apply_column_filter(
        &self,
        account: &str,
        filter: &ColumnFilterPolicy,
        config: &PolicyConfig,
    ) -> PolicyResult<usize> {
        let fallback = config.settings.default_database.clone();
        let (database, table) = match (&filter.database, &filter.table) {
            (Some(db), Some(t)) => (db.clone(), t.clone()),
            (None, Some(t)) => {
                let db = fallback.ok_or_else(|| {
                    PolicyError::Configuration(
                        "column filter has no database and no default_database is set".into(),
                    )
                })?;
                (db, t.clone())
            }
            _ => {
                // Legacy documents omit the target entirely; the fallback
                // uses the default database name as both database and table.
                let db = fallback.ok_or_else(|| {
                    PolicyError::Configuration(
                        "column filter has no target and no default_database is set".into(),
                    )
                })?;
                tracing::warn!(
                    columns = ?filter.columns,
                    database = %db,
                    "column filter declares no table; falling back to the default database as both database and table — declare a table on the filter"
                );
                (db.clone(), db)
            }
        };

        let mut issued = 0;
        for column in &filter.columns {
            for role in &filter.roles {
                let grant = Grant::select(
                    role_arn(account, role),
                    Resource::Table {
                        database: database.clone(),
                        name: table.clone(),
                    },
                )
                .with_excluded_columns([column.clone()]);

                self.catalog.grant_permissions(&grant).await.map_err(|e| {
                    tracing::error!(
                        database = %database,
                        table = %table,
                        column = %column,
                        role = %role,
                        "failed to grant column-filtered access: {e}"
                    );
                    PolicyError::from(e)
                })?;
                issued += 1;
            }
        }
        tracing::info!(
            columns = ?filter.columns,
            roles = ?filter.roles,
            "applied column filter"
        );
        Ok(issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ColumnAccess, ColumnPolicy, DatabaseGrant, PolicySettings,
    };
    use lakegov_catalog::InMemoryCatalog;

    fn deployer() -> (Arc<InMemoryCatalog>, PolicyDeployer) {
        let catalog = Arc::new(InMemoryCatalog::default());
        let deployer = PolicyDeployer::new(catalog.clone());
        (catalog, deployer)
    }

    fn table_policy() -> TablePolicy {
        TablePolicy {
            database: "student_db".into(),
            name: "student_records".into(),
            columns: vec![
                ColumnPolicy {
                    name: "ssn".into(),
                    access: vec![ColumnAccess {
                        role: "registrar".into(),
                        level: Some("full".into()),
                    }],
                },
                ColumnPolicy {
                    name: "gpa".into(),
                    access: vec![ColumnAccess {
                        role: "analyst".into(),
                        level: None,
                    }],
                },
                ColumnPolicy {
                    name: "email".into(),
                    access: vec![],
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_table_grant_excludes_all_other_columns() {
        let (catalog, deployer) = deployer();
        let config = PolicyConfig {
            tables: vec![table_policy()],
            ..Default::default()
        };

        deployer.deploy(&config).await.unwrap();

        let grants = catalog.grants();
        assert_eq!(grants.len(), 2);

        // registrar may see exactly ssn: everything else is excluded.
        let registrar = &grants[0];
        assert_eq!(
            registrar.principal,
            "arn:aws:iam::123456789012:role/registrar"
        );
        assert_eq!(
            registrar.excluded_columns.as_deref(),
            Some(&["gpa".to_string(), "email".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_column_filter_excludes_exactly_that_column() {
        let (catalog, deployer) = deployer();
        let config = PolicyConfig {
            column_filters: vec![ColumnFilterPolicy {
                database: Some("student_db".into()),
                table: Some("student_records".into()),
                columns: vec!["ssn".into()],
                roles: vec!["analyst".into()],
            }],
            ..Default::default()
        };

        deployer.deploy(&config).await.unwrap();

        let grants = catalog.grants();
        assert_eq!(grants.len(), 1);
        // Direction check: the excluded set is {ssn}, not the complement.
        assert_eq!(
            grants[0].excluded_columns.as_deref(),
            Some(&["ssn".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_row_filter_create_then_scoped_grants() {
        let (catalog, deployer) = deployer();
        let config = PolicyConfig {
            row_filters: vec![RowFilterPolicy {
                name: "active_only".into(),
                database: None,
                table: "student_records".into(),
                filter_expression: "enrollment_status = 'ACTIVE'".into(),
                roles: vec!["analyst".into(), "advisor".into()],
            }],
            settings: PolicySettings {
                default_database: Some("student_db".into()),
            },
            ..Default::default()
        };

        deployer.deploy(&config).await.unwrap();

        let filters = catalog.row_filters();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].database, "student_db");
        assert_eq!(filters[0].table, "student_records");

        let grants = catalog.grants();
        assert_eq!(grants.len(), 2);
        assert!(grants
            .iter()
            .all(|g| g.row_filter.as_deref() == Some("active_only")));
    }

    #[tokio::test]
    async fn test_duplicate_database_aborts_deploy() {
        let (catalog, deployer) = deployer();
        let database = DatabasePolicy {
            name: "student_db".into(),
            description: None,
            location: None,
            permissions: vec![DatabaseGrant {
                role: "data_engineer".into(),
                access: "SELECT".into(),
            }],
        };
        let config = PolicyConfig {
            databases: vec![database.clone(), database],
            ..Default::default()
        };

        let err = deployer.deploy(&config).await.unwrap_err();
        assert!(matches!(err, PolicyError::Catalog(_)));

        // The first database's grant was applied and stays applied.
        assert_eq!(catalog.grants().len(), 1);
        assert_eq!(catalog.database_names(), vec!["student_db".to_string()]);
    }

    #[tokio::test]
    async fn test_database_permissions_split_on_commas() {
        let (catalog, deployer) = deployer();
        let config = PolicyConfig {
            databases: vec![DatabasePolicy {
                name: "student_db".into(),
                description: Some("Curated".into()),
                location: Some("s3://data-lake/curated/".into()),
                permissions: vec![DatabaseGrant {
                    role: "data_engineer".into(),
                    access: "SELECT, ALTER".into(),
                }],
            }],
            ..Default::default()
        };

        deployer.deploy(&config).await.unwrap();
        assert_eq!(catalog.grants()[0].permissions, vec!["SELECT", "ALTER"]);
    }

    #[tokio::test]
    async fn test_targetless_column_filter_falls_back_to_default_database() {
        let (catalog, deployer) = deployer();
        let config = PolicyConfig {
            column_filters: vec![ColumnFilterPolicy {
                database: None,
                table: None,
                columns: vec!["ssn".into()],
                roles: vec!["analyst".into()],
            }],
            settings: PolicySettings {
                default_database: Some("student_db".into()),
            },
            ..Default::default()
        };

        deployer.deploy(&config).await.unwrap();

        let grants = catalog.grants();
        match &grants[0].resource {
            lakegov_catalog::Resource::Table { database, name } => {
                assert_eq!(database, "student_db");
                assert_eq!(name, "student_db");
            }
            other => panic!("unexpected resource: {other:?}"),
        }
    }
}
