//! In-memory catalog fake.

use crate::client::{CatalogClient, DatabaseInput, Grant, RowFilterInput, TableParameters};
use crate::{CatalogError, CatalogResult};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

/// In-memory catalog that records every call, used as the test double for
/// the policy deployer and the classifier's write-through path.
pub struct InMemoryCatalog {
    account: String,
    databases: DashMap<String, DatabaseInput>,
    tables: DashMap<(String, String), TableParameters>,
    grants: Mutex<Vec<Grant>>,
    row_filters: Mutex<Vec<RowFilterInput>>,
}

impl InMemoryCatalog {
    /// Creates a fake catalog for the given account id.
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            databases: DashMap::new(),
            tables: DashMap::new(),
            grants: Mutex::new(Vec::new()),
            row_filters: Mutex::new(Vec::new()),
        }
    }

    /// Seeds a table so parameter reads succeed.
    pub fn seed_table(&self, database: impl Into<String>, table: impl Into<String>) {
        self.tables
            .insert((database.into(), table.into()), TableParameters::new());
    }

    /// Returns the database names created so far.
    #[must_use]
    pub fn database_names(&self) -> Vec<String> {
        self.databases.iter().map(|e| e.key().clone()).collect()
    }

    /// Returns a copy of all issued grants, in call order.
    #[must_use]
    pub fn grants(&self) -> Vec<Grant> {
        self.grants.lock().clone()
    }

    /// Returns a copy of all created row filters, in call order.
    #[must_use]
    pub fn row_filters(&self) -> Vec<RowFilterInput> {
        self.row_filters.lock().clone()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new("123456789012")
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    fn name(&self) -> &str {
        "memory"
    }

    async fn account_id(&self) -> CatalogResult<String> {
        Ok(self.account.clone())
    }

    async fn create_database(&self, input: &DatabaseInput) -> CatalogResult<()> {
        if self.databases.contains_key(&input.name) {
            return Err(CatalogError::AlreadyExists(format!(
                "database {}",
                input.name
            )));
        }
        self.databases.insert(input.name.clone(), input.clone());
        Ok(())
    }

    async fn get_table_parameters(
        &self,
        database: &str,
        table: &str,
    ) -> CatalogResult<TableParameters> {
        self.tables
            .get(&(database.to_string(), table.to_string()))
            .map(|e| e.value().clone())
            .ok_or_else(|| CatalogError::NotFound(format!("table {database}.{table}")))
    }

    async fn update_table_parameters(
        &self,
        database: &str,
        table: &str,
        parameters: TableParameters,
    ) -> CatalogResult<()> {
        let key = (database.to_string(), table.to_string());
        if !self.tables.contains_key(&key) {
            return Err(CatalogError::NotFound(format!("table {database}.{table}")));
        }
        self.tables.insert(key, parameters);
        Ok(())
    }

    async fn grant_permissions(&self, grant: &Grant) -> CatalogResult<()> {
        self.grants.lock().push(grant.clone());
        Ok(())
    }

    async fn create_row_filter(&self, input: &RowFilterInput) -> CatalogResult<()> {
        self.row_filters.lock().push(input.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Resource;

    #[tokio::test]
    async fn test_duplicate_database_rejected() {
        let catalog = InMemoryCatalog::default();
        let input = DatabaseInput::new("student_db");

        catalog.create_database(&input).await.unwrap();
        let err = catalog.create_database(&input).await.unwrap_err();
        assert!(matches!(err, CatalogError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_parameter_read_modify_write() {
        let catalog = InMemoryCatalog::default();
        catalog.seed_table("db", "t");

        let mut params = catalog.get_table_parameters("db", "t").await.unwrap();
        params.insert("classification_ssn".into(), "{}".into());
        catalog
            .update_table_parameters("db", "t", params)
            .await
            .unwrap();

        let params = catalog.get_table_parameters("db", "t").await.unwrap();
        assert!(params.contains_key("classification_ssn"));
    }

    #[tokio::test]
    async fn test_unknown_table_is_not_found() {
        let catalog = InMemoryCatalog::default();
        let err = catalog.get_table_parameters("db", "t").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_grants_accumulate() {
        let catalog = InMemoryCatalog::default();
        let grant = Grant::select(
            "arn:aws:iam::1:role/analyst",
            Resource::Database { name: "db".into() },
        );

        catalog.grant_permissions(&grant).await.unwrap();
        catalog.grant_permissions(&grant).await.unwrap();
        assert_eq!(catalog.grants().len(), 2);
    }
}
