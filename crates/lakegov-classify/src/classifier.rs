//! Field classifier.

use crate::config::ClassifierConfig;
use crate::patterns::PatternTable;
use crate::ClassifyResult;
use lakegov_catalog::CatalogClient;
use lakegov_core::FieldClassification;
use serde_json::json;
use std::path::Path;

/// Classifies fields by name and sample values against the PII pattern
/// table, then applies the industry-specific override list.
pub struct FieldClassifier {
    table: PatternTable,
    sensitive_fields: Vec<String>,
}

impl FieldClassifier {
    /// Creates a classifier from a parsed configuration.
    pub fn new(config: ClassifierConfig) -> ClassifyResult<Self> {
        let mut table = PatternTable::builtin();
        for pattern in config.patterns {
            table.add(pattern)?;
        }
        Ok(Self {
            table,
            sensitive_fields: config.sensitive_fields,
        })
    }

    /// Creates a classifier from a YAML config file, failing fast on a
    /// missing or malformed file.
    pub fn from_config_file(path: impl AsRef<Path>) -> ClassifyResult<Self> {
        Self::new(ClassifierConfig::from_yaml_file(path)?)
    }

    /// Classifies a field from its name and a sample of its values.
    ///
    /// Name matches win over value matches; the industry override list wins
    /// over both and always forces masking.
    pub fn classify_field<S: AsRef<str>>(
        &self,
        field_name: &str,
        sample_values: &[S],
    ) -> FieldClassification {
        let lower = field_name.to_lowercase();

        let mut classification = None;
        for pattern in self.table.iter() {
            if lower.contains(pattern.name()) {
                classification = Some(FieldClassification::confidential(
                    field_name,
                    pattern.name(),
                ));
                break;
            }
        }

        if classification.is_none() {
            'values: for value in sample_values {
                for pattern in self.table.iter() {
                    if pattern.matches_value(value.as_ref()) {
                        classification = Some(FieldClassification::confidential(
                            field_name,
                            pattern.name(),
                        ));
                        break 'values;
                    }
                }
            }
        }

        let classification =
            classification.unwrap_or_else(|| FieldClassification::standard(field_name));

        if self.sensitive_fields.iter().any(|f| f == field_name) {
            classification.restricted()
        } else {
            classification
        }
    }

    /// Persists classifications onto a catalog table's parameter map, keyed
    /// `classification_<field_name>`.
    ///
    /// This is a read-modify-write of the whole map: two concurrent callers
    /// can overwrite each other's entries. Accepted limitation; the catalog
    /// offers no atomic merge.
    pub async fn apply_to_table(
        &self,
        catalog: &dyn CatalogClient,
        database: &str,
        table: &str,
        classifications: &[FieldClassification],
    ) -> ClassifyResult<()> {
        let mut parameters = catalog.get_table_parameters(database, table).await?;

        for classification in classifications {
            let value = serde_json::to_string(&json!({
                "privacy_level": classification.privacy_level,
                "pii_type": classification.pii_type,
                "masking_required": classification.masking_required,
                "description": classification.description,
            }))?;
            parameters.insert(
                format!("classification_{}", classification.field_name),
                value,
            );
        }

        catalog
            .update_table_parameters(database, table, parameters)
            .await
            .map_err(|e| {
                tracing::error!(database, table, "failed to persist classifications: {e}");
                e
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PiiPattern;
    use lakegov_catalog::InMemoryCatalog;
    use lakegov_core::PrivacyLevel;

    fn classifier() -> FieldClassifier {
        FieldClassifier::new(ClassifierConfig {
            sensitive_fields: vec!["disciplinary_record".to_string()],
            patterns: vec![PiiPattern::new("student_id", r"[A-Z]{2}\d{8}")],
        })
        .unwrap()
    }

    #[test]
    fn test_name_match_wins_regardless_of_values() {
        let c = classifier().classify_field("customer_ssn", &["not a match"]);
        assert_eq!(c.privacy_level, PrivacyLevel::Confidential);
        assert_eq!(c.pii_type.as_deref(), Some("ssn"));
        assert!(c.masking_required);
    }

    #[test]
    fn test_value_match_with_neutral_name() {
        let c = classifier().classify_field("contact", &["a@b.co"]);
        assert_eq!(c.privacy_level, PrivacyLevel::Confidential);
        assert_eq!(c.pii_type.as_deref(), Some("email"));
    }

    #[test]
    fn test_first_pattern_in_order_wins_for_values() {
        // "123456789" satisfies both the ssn and phone patterns; ssn is
        // earlier in the table.
        let c = classifier().classify_field("reference", &["123456789"]);
        assert_eq!(c.pii_type.as_deref(), Some("ssn"));
    }

    #[test]
    fn test_sensitive_field_overrides_to_restricted() {
        let c = classifier().classify_field("disciplinary_record", &["a@b.co"]);
        assert_eq!(c.privacy_level, PrivacyLevel::Restricted);
        assert!(c.masking_required);
    }

    #[test]
    fn test_unmatched_field_is_internal() {
        let c = classifier().classify_field("department", &["physics"]);
        assert_eq!(c.privacy_level, PrivacyLevel::Internal);
        assert_eq!(c.pii_type, None);
        assert!(!c.masking_required);
    }

    #[test]
    fn test_custom_pattern_matches() {
        let c = classifier().classify_field("identifier", &["AB12345678"]);
        assert_eq!(c.pii_type.as_deref(), Some("student_id"));
    }

    #[tokio::test]
    async fn test_apply_to_table_writes_parameters() {
        let catalog = InMemoryCatalog::default();
        catalog.seed_table("student_db", "records");

        let classifier = classifier();
        let classifications = vec![classifier.classify_field("ssn", &[] as &[&str])];
        classifier
            .apply_to_table(&catalog, "student_db", "records", &classifications)
            .await
            .unwrap();

        let params = catalog
            .get_table_parameters("student_db", "records")
            .await
            .unwrap();
        let entry = params.get("classification_ssn").unwrap();
        assert!(entry.contains("\"CONFIDENTIAL\""));
        assert!(entry.contains("\"masking_required\":true"));
    }
}
