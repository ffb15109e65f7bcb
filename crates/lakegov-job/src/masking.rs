//! Masking transforms.

use crate::JobResult;
use lakegov_core::{Cell, Frame};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Replacement value for fully redacted cells.
pub const MASK_VALUE: &str = "********";

/// How a field is masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaskingType {
    /// Replace the value with its SHA-256 hex digest.
    Hash,
    /// Replace every value, nulls included, with [`MASK_VALUE`].
    MaskAll,
}

/// A masking rule bound to a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskingRule {
    /// Column to mask.
    pub field: String,
    /// Masking transform.
    pub masking_type: MaskingType,
}

/// Masks one cell. Pure: the result depends only on the cell itself.
///
/// Hashing keeps nulls null (there is nothing to hash); full redaction
/// replaces nulls too, matching a constant-literal column rewrite.
#[must_use]
pub fn mask_cell(masking_type: MaskingType, cell: &Cell) -> Cell {
    match masking_type {
        MaskingType::Hash => match cell {
            Cell::Null => Cell::Null,
            other => {
                let digest = Sha256::digest(other.to_string().as_bytes());
                Cell::Text(format!("{digest:x}"))
            }
        },
        MaskingType::MaskAll => Cell::Text(MASK_VALUE.to_string()),
    }
}

/// Applies every masking rule to the frame in declared order.
pub fn apply_masking(frame: &mut Frame, rules: &[MaskingRule]) -> JobResult<()> {
    for rule in rules {
        frame.map_column(&rule.field, |cell| mask_cell(rule.masking_type, cell))?;
        tracing::debug!(field = %rule.field, masking = ?rule.masking_type, "masked column");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic_hex() {
        let a = mask_cell(MaskingType::Hash, &Cell::Text("123-45-6789".into()));
        let b = mask_cell(MaskingType::Hash, &Cell::Text("123-45-6789".into()));
        assert_eq!(a, b);

        match a {
            Cell::Text(hex) => {
                assert_eq!(hex.len(), 64);
                assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_hash_keeps_nulls_null() {
        assert_eq!(mask_cell(MaskingType::Hash, &Cell::Null), Cell::Null);
    }

    #[test]
    fn test_mask_all_replaces_everything() {
        assert_eq!(
            mask_cell(MaskingType::MaskAll, &Cell::Text("secret".into())),
            Cell::Text(MASK_VALUE.into())
        );
        assert_eq!(
            mask_cell(MaskingType::MaskAll, &Cell::Null),
            Cell::Text(MASK_VALUE.into())
        );
    }

    #[test]
    fn test_apply_masking_leaves_other_columns_alone() {
        let csv = "ssn,department\n123-45-6789,physics\n";
        let mut frame = Frame::from_csv(csv.as_bytes()).unwrap();
        apply_masking(
            &mut frame,
            &[MaskingRule {
                field: "ssn".into(),
                masking_type: MaskingType::Hash,
            }],
        )
        .unwrap();

        assert_ne!(
            frame.cell(0, "ssn").unwrap(),
            &Cell::Text("123-45-6789".into())
        );
        assert_eq!(
            frame.cell(0, "department").unwrap(),
            &Cell::Text("physics".into())
        );
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let mut frame = Frame::from_csv("a\n1\n".as_bytes()).unwrap();
        let err = apply_masking(
            &mut frame,
            &[MaskingRule {
                field: "missing".into(),
                masking_type: MaskingType::MaskAll,
            }],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_masking_rule_yaml_shape() {
        let yaml = r#"
- field: ssn
  masking_type: HASH
- field: date_of_birth
  masking_type: MASK_ALL
"#;
        let rules: Vec<MaskingRule> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rules[0].masking_type, MaskingType::Hash);
        assert_eq!(rules[1].masking_type, MaskingType::MaskAll);
    }
}
