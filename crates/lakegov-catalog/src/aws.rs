//! AWS Glue + Lake Formation catalog client.

use crate::client::{CatalogClient, DatabaseInput, Grant, Resource, RowFilterInput, TableParameters};
use crate::{CatalogError, CatalogResult};
use async_trait::async_trait;

/// AWS catalog configuration.
#[derive(Debug, Clone, Default)]
pub struct AwsCatalogConfig {
    /// AWS region override.
    pub region: Option<String>,
}

/// Catalog client over AWS Glue (metadata) and Lake Formation (permissions).
#[cfg(feature = "aws")]
pub struct AwsCatalog {
    glue: aws_sdk_glue::Client,
    lakeformation: aws_sdk_lakeformation::Client,
    account: String,
}

#[cfg(feature = "aws")]
impl AwsCatalog {
    /// Creates a client from ambient AWS credentials, resolving the caller's
    /// account id once up front.
    pub async fn new(config: AwsCatalogConfig) -> CatalogResult<Self> {
        let mut loader = aws_config::from_env();
        if let Some(ref region) = config.region {
            loader = loader.region(aws_sdk_glue::config::Region::new(region.clone()));
        }
        let aws_config = loader.load().await;

        let sts = aws_sdk_sts::Client::new(&aws_config);
        let identity = sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| CatalogError::Service(e.to_string()))?;
        let account = identity
            .account
            .ok_or_else(|| CatalogError::Service("caller identity has no account id".into()))?;

        Ok(Self {
            glue: aws_sdk_glue::Client::new(&aws_config),
            lakeformation: aws_sdk_lakeformation::Client::new(&aws_config),
            account,
        })
    }
}

#[cfg(feature = "aws")]
#[async_trait]
impl CatalogClient for AwsCatalog {
    fn name(&self) -> &str {
        "aws"
    }

    async fn account_id(&self) -> CatalogResult<String> {
        Ok(self.account.clone())
    }

    async fn create_database(&self, input: &DatabaseInput) -> CatalogResult<()> {
        let mut builder = aws_sdk_glue::types::DatabaseInput::builder().name(&input.name);
        if let Some(ref description) = input.description {
            builder = builder.description(description);
        }
        if let Some(ref location) = input.location {
            builder = builder.location_uri(location);
        }
        let database_input = builder
            .build()
            .map_err(|e| CatalogError::Service(e.to_string()))?;

        self.glue
            .create_database()
            .database_input(database_input)
            .send()
            .await
            .map_err(|e| {
                let err = e.to_string();
                if err.contains("AlreadyExistsException") {
                    CatalogError::AlreadyExists(format!("database {}", input.name))
                } else {
                    CatalogError::Service(err)
                }
            })?;
        Ok(())
    }

    async fn get_table_parameters(
        &self,
        database: &str,
        table: &str,
    ) -> CatalogResult<TableParameters> {
        let response = self
            .glue
            .get_table()
            .database_name(database)
            .name(table)
            .send()
            .await
            .map_err(|e| {
                let err = e.to_string();
                if err.contains("EntityNotFoundException") {
                    CatalogError::NotFound(format!("table {database}.{table}"))
                } else {
                    CatalogError::Service(err)
                }
            })?;

        Ok(response
            .table
            .and_then(|t| t.parameters)
            .unwrap_or_default())
    }

    async fn update_table_parameters(
        &self,
        database: &str,
        table: &str,
        parameters: TableParameters,
    ) -> CatalogResult<()> {
        let table_input = aws_sdk_glue::types::TableInput::builder()
            .name(table)
            .set_parameters(Some(parameters))
            .build()
            .map_err(|e| CatalogError::Service(e.to_string()))?;

        self.glue
            .update_table()
            .database_name(database)
            .table_input(table_input)
            .send()
            .await
            .map_err(|e| CatalogError::Service(e.to_string()))?;
        Ok(())
    }

    async fn grant_permissions(&self, grant: &Grant) -> CatalogResult<()> {
        use aws_sdk_lakeformation::types::{
            ColumnWildcard, DataCellsFilterResource, DataLakePrincipal, DatabaseResource,
            Permission, TableResource, TableWithColumnsResource,
        };

        let principal = DataLakePrincipal::builder()
            .data_lake_principal_identifier(&grant.principal)
            .build();

        let mut resource = aws_sdk_lakeformation::types::Resource::builder();
        match &grant.resource {
            Resource::Database { name } => {
                resource = resource.database(
                    DatabaseResource::builder().name(name).build(),
                );
            }
            Resource::Table { database, name } => {
                if let Some(ref excluded) = grant.excluded_columns {
                    let wildcard = ColumnWildcard::builder()
                        .set_excluded_column_names(Some(excluded.clone()))
                        .build();
                    resource = resource.table_with_columns(
                        TableWithColumnsResource::builder()
                            .database_name(database)
                            .name(name)
                            .column_wildcard(wildcard)
                            .build()
                            .map_err(|e| CatalogError::Service(e.to_string()))?,
                    );
                } else if let Some(ref filter) = grant.row_filter {
                    resource = resource.data_cells_filter(
                        DataCellsFilterResource::builder()
                            .table_catalog_id(&self.account)
                            .database_name(database)
                            .table_name(name)
                            .name(filter)
                            .build(),
                    );
                } else {
                    resource = resource.table(
                        TableResource::builder()
                            .database_name(database)
                            .name(name)
                            .build()
                            .map_err(|e| CatalogError::Service(e.to_string()))?,
                    );
                }
            }
        }

        let permissions: Vec<Permission> = grant
            .permissions
            .iter()
            .map(|p| Permission::from(p.as_str()))
            .collect();

        self.lakeformation
            .grant_permissions()
            .principal(principal)
            .resource(resource.build())
            .set_permissions(Some(permissions))
            .send()
            .await
            .map_err(|e| CatalogError::Service(e.to_string()))?;
        Ok(())
    }

    async fn create_row_filter(&self, input: &RowFilterInput) -> CatalogResult<()> {
        use aws_sdk_lakeformation::types::{DataCellsFilter, RowFilter};

        let filter = DataCellsFilter::builder()
            .table_catalog_id(&self.account)
            .database_name(&input.database)
            .table_name(&input.table)
            .name(&input.name)
            .row_filter(
                RowFilter::builder()
                    .filter_expression(&input.filter_expression)
                    .build(),
            )
            .build()
            .map_err(|e| CatalogError::Service(e.to_string()))?;

        self.lakeformation
            .create_data_cells_filter()
            .table_data(filter)
            .send()
            .await
            .map_err(|e| CatalogError::Service(e.to_string()))?;
        Ok(())
    }
}

/// Stub AWS catalog when the feature is disabled.
#[cfg(not(feature = "aws"))]
pub struct AwsCatalog;

#[cfg(not(feature = "aws"))]
impl AwsCatalog {
    /// Creates a new AWS catalog client (stub).
    pub async fn new(_config: AwsCatalogConfig) -> CatalogResult<Self> {
        Err(CatalogError::Configuration(
            "AWS catalog support not enabled. Enable the 'aws' feature.".to_string(),
        ))
    }
}
