//! Governance configuration document.
//!
//! One YAML file drives every subcommand. Recognized top-level keys:
//! `sensitive_fields`, `classification_rules`, `quality_rules.<dataset>`,
//! `masking_rules`, `databases`, `tables`, `row_filters`, `column_filters`,
//! `job`, and `settings`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use lakegov_catalog::{CatalogClient, InMemoryCatalog};
use lakegov_classify::{ClassifierConfig, PiiPattern};
use lakegov_job::{JobConfig, MaskingRule};
use lakegov_policy::{
    ColumnFilterPolicy, DatabasePolicy, PolicyConfig, PolicySettings, RowFilterPolicy, TablePolicy,
};
use lakegov_quality::QualityRule;
use lakegov_store::{FilesystemStore, InMemoryStore, ObjectStore};

use crate::output::CliError;

/// The full governance document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GovernanceConfig {
    /// Industry-specific sensitive fields (always RESTRICTED and masked).
    #[serde(default)]
    pub sensitive_fields: Vec<String>,

    /// Classification rules for the batch job.
    #[serde(default)]
    pub classification_rules: ClassificationRules,

    /// Quality rule suites, keyed by dataset name.
    #[serde(default)]
    pub quality_rules: HashMap<String, Vec<QualityRule>>,

    /// Masking rules for the batch job.
    #[serde(default)]
    pub masking_rules: Vec<MaskingRule>,

    /// Databases to create and grant on.
    #[serde(default)]
    pub databases: Vec<DatabasePolicy>,

    /// Per-column table access.
    #[serde(default)]
    pub tables: Vec<TablePolicy>,

    /// Named row-filter predicates.
    #[serde(default)]
    pub row_filters: Vec<RowFilterPolicy>,

    /// Column-exclusion filters.
    #[serde(default)]
    pub column_filters: Vec<ColumnFilterPolicy>,

    /// Batch job wiring.
    #[serde(default)]
    pub job: Option<JobConfig>,

    /// Collaborator and deployment settings.
    #[serde(default)]
    pub settings: Settings,
}

/// Classification rules section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassificationRules {
    /// Sensitive fields tagged as PII by the batch job.
    #[serde(default)]
    pub sensitive_fields: Vec<String>,

    /// Extra domain PII patterns, appended after the builtins.
    #[serde(default)]
    pub patterns: Vec<PiiPattern>,
}

/// Collaborator wiring and deployment settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Fallback database for filters that do not declare a target.
    #[serde(default)]
    pub default_database: Option<String>,

    /// Key prefix for lineage objects.
    #[serde(default)]
    pub lineage_prefix: Option<String>,

    /// Object-store wiring.
    #[serde(default)]
    pub store: StoreSettings,

    /// Catalog wiring.
    #[serde(default)]
    pub catalog: CatalogSettings,
}

/// Object-store wiring.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Backend type: `memory`, `filesystem`, or `s3`.
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Filesystem root directory.
    pub path: Option<String>,
    /// S3 bucket name.
    pub bucket: Option<String>,
    /// S3 region.
    pub region: Option<String>,
    /// S3 endpoint (for S3-compatible services).
    pub endpoint: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: None,
            bucket: None,
            region: None,
            endpoint: None,
        }
    }
}

/// Catalog wiring.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// Provider: `memory` or `aws`.
    #[serde(default = "default_catalog_provider")]
    pub provider: String,
    /// AWS region override.
    pub region: Option<String>,
    /// Account id for the in-memory provider.
    pub account_id: Option<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            provider: default_catalog_provider(),
            region: None,
            account_id: None,
        }
    }
}

fn default_store_backend() -> String {
    "filesystem".to_string()
}

fn default_catalog_provider() -> String {
    "memory".to_string()
}

fn default_store_path() -> String {
    "./lakegov-data".to_string()
}

impl GovernanceConfig {
    /// Loads the document from a YAML file, failing fast on a missing or
    /// malformed file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&content)
            .map_err(|e| CliError::config(format!("invalid config {}: {e}", path.display())))
    }

    /// Returns the union of the top-level and classification-rule sensitive
    /// field lists, first occurrence wins.
    #[must_use]
    pub fn all_sensitive_fields(&self) -> Vec<String> {
        let mut fields = self.sensitive_fields.clone();
        for field in &self.classification_rules.sensitive_fields {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }
        fields
    }

    /// Builds the classifier configuration slice of the document.
    #[must_use]
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            sensitive_fields: self.all_sensitive_fields(),
            patterns: self.classification_rules.patterns.clone(),
        }
    }

    /// Builds the policy slice of the document.
    #[must_use]
    pub fn policy_config(&self) -> PolicyConfig {
        PolicyConfig {
            databases: self.databases.clone(),
            tables: self.tables.clone(),
            row_filters: self.row_filters.clone(),
            column_filters: self.column_filters.clone(),
            settings: PolicySettings {
                default_database: self.settings.default_database.clone(),
            },
        }
    }

    /// Returns the quality rules for a dataset.
    pub fn quality_rules_for(&self, dataset: &str) -> Result<Vec<QualityRule>, CliError> {
        self.quality_rules.get(dataset).cloned().ok_or_else(|| {
            CliError::config(format!("no quality_rules entry for dataset '{dataset}'"))
        })
    }

    /// Constructs the configured object store.
    pub async fn build_store(&self) -> Result<Arc<dyn ObjectStore>, CliError> {
        let settings = &self.settings.store;
        match settings.backend.as_str() {
            "memory" => Ok(Arc::new(InMemoryStore::new())),
            "filesystem" => {
                let path = settings.path.clone().unwrap_or_else(default_store_path);
                Ok(Arc::new(FilesystemStore::new(path).await?))
            }
            #[cfg(feature = "aws")]
            "s3" => {
                use lakegov_store::{S3Config, S3Store};

                let bucket = settings.bucket.clone().ok_or_else(|| {
                    CliError::config("settings.store.bucket is required for the s3 backend")
                })?;
                let mut config = S3Config::new(bucket);
                if let Some(ref region) = settings.region {
                    config = config.with_region(region);
                }
                if let Some(ref endpoint) = settings.endpoint {
                    config = config.with_endpoint(endpoint);
                }
                Ok(Arc::new(S3Store::new(config).await?))
            }
            #[cfg(not(feature = "aws"))]
            "s3" => Err(CliError::config(
                "S3 store support not enabled; build with the 'aws' feature",
            )),
            other => Err(CliError::config(format!(
                "unknown store backend '{other}' (expected memory, filesystem, or s3)"
            ))),
        }
    }

    /// Constructs the configured catalog client.
    pub async fn build_catalog(&self) -> Result<Arc<dyn CatalogClient>, CliError> {
        let settings = &self.settings.catalog;
        match settings.provider.as_str() {
            "memory" => {
                let account = settings
                    .account_id
                    .clone()
                    .unwrap_or_else(|| "123456789012".to_string());
                Ok(Arc::new(InMemoryCatalog::new(account)))
            }
            #[cfg(feature = "aws")]
            "aws" => {
                use lakegov_catalog::aws::{AwsCatalog, AwsCatalogConfig};

                let catalog = AwsCatalog::new(AwsCatalogConfig {
                    region: settings.region.clone(),
                })
                .await?;
                Ok(Arc::new(catalog))
            }
            #[cfg(not(feature = "aws"))]
            "aws" => Err(CliError::config(
                "AWS catalog support not enabled; build with the 'aws' feature",
            )),
            other => Err(CliError::config(format!(
                "unknown catalog provider '{other}' (expected memory or aws)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
sensitive_fields: [ssn, date_of_birth]
classification_rules:
  sensitive_fields: [student_id]
quality_rules:
  student_records:
    - type: numeric
      field: gpa
      min_value: 0.0
      max_value: 4.0
masking_rules:
  - field: ssn
    masking_type: HASH
databases:
  - name: student_db
settings:
  default_database: student_db
  store:
    backend: memory
"#;

    #[test]
    fn test_full_document_parses() {
        let config: GovernanceConfig = serde_yaml::from_str(DOC).unwrap();
        assert_eq!(
            config.all_sensitive_fields(),
            vec!["ssn", "date_of_birth", "student_id"]
        );
        assert_eq!(config.quality_rules["student_records"].len(), 1);
        assert_eq!(config.settings.store.backend, "memory");
        assert!(config.job.is_none());
    }

    #[test]
    fn test_policy_slice() {
        let config: GovernanceConfig = serde_yaml::from_str(DOC).unwrap();
        let policy = config.policy_config();
        assert_eq!(policy.databases.len(), 1);
        assert_eq!(
            policy.settings.default_database.as_deref(),
            Some("student_db")
        );
    }

    #[test]
    fn test_missing_dataset_rules_is_config_error() {
        let config: GovernanceConfig = serde_yaml::from_str(DOC).unwrap();
        assert!(config.quality_rules_for("unknown").is_err());
        assert!(config.quality_rules_for("student_records").is_ok());
    }

    #[tokio::test]
    async fn test_build_memory_store() {
        let config: GovernanceConfig = serde_yaml::from_str(DOC).unwrap();
        let store = config.build_store().await.unwrap();
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn test_unknown_backend_is_config_error() {
        let mut config: GovernanceConfig = serde_yaml::from_str(DOC).unwrap();
        config.settings.store.backend = "tape".into();
        assert!(config.build_store().await.is_err());
    }
}
