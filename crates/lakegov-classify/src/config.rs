//! Classifier configuration.

use crate::patterns::PiiPattern;
use crate::{ClassifyError, ClassifyResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Industry-specific classification configuration.
///
/// Loaded from a YAML document; unknown top-level keys are ignored so the
/// classifier can be fed the full governance document. Loading fails fast on
/// an unreadable or malformed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Fields that are always RESTRICTED and masked, regardless of any
    /// pattern match.
    #[serde(default)]
    pub sensitive_fields: Vec<String>,

    /// Extra domain patterns, appended after the builtins.
    #[serde(default)]
    pub patterns: Vec<PiiPattern>,
}

impl ClassifierConfig {
    /// Loads the configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ClassifyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifyError::Configuration(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parses the configuration from a YAML string.
    pub fn from_yaml(content: &str) -> ClassifyResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| ClassifyError::Configuration(format!("invalid config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
sensitive_fields:
  - student_id
  - disciplinary_record
patterns:
  - name: student_id
    regex: "[A-Z]{2}\\d{8}"
settings:
  default_database: student_db
"#;
        let config = ClassifierConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.sensitive_fields.len(), 2);
        assert_eq!(config.patterns[0].name, "student_id");
    }

    #[test]
    fn test_malformed_config_fails_fast() {
        let err = ClassifierConfig::from_yaml("sensitive_fields: {not: [a, list").unwrap_err();
        assert!(matches!(err, ClassifyError::Configuration(_)));
    }

    #[test]
    fn test_missing_file_fails_fast() {
        let err = ClassifierConfig::from_yaml_file("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, ClassifyError::Configuration(_)));
    }
}
