//! Policy configuration model.

use crate::{PolicyError, PolicyResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level policy document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
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
    /// Deployment settings.
    #[serde(default)]
    pub settings: PolicySettings,
}

impl PolicyConfig {
    /// Loads the policy document from a YAML file, failing fast on a
    /// missing or malformed file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> PolicyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PolicyError::Configuration(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parses the policy document from a YAML string.
    pub fn from_yaml(content: &str) -> PolicyResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| PolicyError::Configuration(format!("invalid config: {e}")))
    }
}

/// Deployment settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Fallback database for filters that do not declare a target.
    #[serde(default)]
    pub default_database: Option<String>,
}

/// A database to create, with its database-level grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabasePolicy {
    /// Database name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Storage location URI.
    #[serde(default)]
    pub location: Option<String>,
    /// Database-level grants.
    #[serde(default)]
    pub permissions: Vec<DatabaseGrant>,
}

/// One database-level grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseGrant {
    /// Role name (resolved to a role ARN at deploy time).
    pub role: String,
    /// Comma-separated permission list, e.g. `SELECT,ALTER`.
    pub access: String,
}

impl DatabaseGrant {
    /// Splits the access string into individual permissions.
    #[must_use]
    pub fn permissions(&self) -> Vec<String> {
        self.access
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Per-column access on one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablePolicy {
    /// Database the table lives in.
    pub database: String,
    /// Table name.
    pub name: String,
    /// Column access declarations.
    #[serde(default)]
    pub columns: Vec<ColumnPolicy>,
}

/// Access declarations for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnPolicy {
    /// Column name.
    pub name: String,
    /// Who may see this column.
    #[serde(default)]
    pub access: Vec<ColumnAccess>,
}

/// One column access entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnAccess {
    /// Role name.
    pub role: String,
    /// Access level label (informational; grants are always SELECT).
    #[serde(default)]
    pub level: Option<String>,
}

/// A named row-filter predicate and the roles granted through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowFilterPolicy {
    /// Filter name.
    pub name: String,
    /// Database of the filtered table; falls back to
    /// `settings.default_database`.
    #[serde(default)]
    pub database: Option<String>,
    /// Filtered table.
    pub table: String,
    /// Filter predicate expression.
    pub filter_expression: String,
    /// Roles granted SELECT through this filter.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A column-exclusion filter: each listed role may see everything except
/// the listed columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnFilterPolicy {
    /// Database of the filtered table; falls back to
    /// `settings.default_database`.
    #[serde(default)]
    pub database: Option<String>,
    /// Filtered table; falls back to `settings.default_database` (flagged
    /// with a warning at deploy time).
    #[serde(default)]
    pub table: Option<String>,
    /// Columns to hide.
    pub columns: Vec<String>,
    /// Roles the exclusion applies to.
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
databases:
  - name: student_db
    description: Curated student records
    location: s3://data-lake/curated/
    permissions:
      - role: data_engineer
        access: "SELECT,ALTER"
tables:
  - database: student_db
    name: student_records
    columns:
      - name: ssn
        access:
          - role: registrar
            level: full
      - name: gpa
        access:
          - role: analyst
row_filters:
  - name: active_only
    table: student_records
    filter_expression: "enrollment_status = 'ACTIVE'"
    roles: [analyst]
column_filters:
  - columns: [ssn]
    roles: [analyst]
settings:
  default_database: student_db
"#;
        let config = PolicyConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.databases.len(), 1);
        assert_eq!(
            config.databases[0].permissions[0].permissions(),
            vec!["SELECT", "ALTER"]
        );
        assert_eq!(config.tables[0].columns.len(), 2);
        assert_eq!(config.row_filters[0].table, "student_records");
        assert!(config.column_filters[0].table.is_none());
        assert_eq!(config.settings.default_database.as_deref(), Some("student_db"));
    }

    #[test]
    fn test_malformed_document_fails_fast() {
        let err = PolicyConfig::from_yaml("databases: [{name: [}]").unwrap_err();
        assert!(matches!(err, PolicyError::Configuration(_)));
    }

    #[test]
    fn test_missing_file_fails_fast() {
        let err = PolicyConfig::from_yaml_file("/nonexistent/policies.yaml").unwrap_err();
        assert!(matches!(err, PolicyError::Configuration(_)));
    }
}
