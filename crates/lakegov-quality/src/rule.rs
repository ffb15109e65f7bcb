//! Quality rule definitions and per-value evaluation.

use crate::QualityResult;
use lakegov_core::Cell;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A declarative quality rule bound to a column.
///
/// Deserializes from rule objects of the form
/// `{type: numeric, field: gpa, min_value: 0.0, max_value: 4.0, null_allowed: false}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRule {
    /// Column the rule applies to.
    pub field: String,
    /// Whether null values pass the rule.
    #[serde(default)]
    pub null_allowed: bool,
    /// Rule kind and its parameters.
    #[serde(flatten)]
    pub kind: RuleKind,
}

/// Rule kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    /// Inclusive numeric range.
    Numeric {
        /// Lower bound.
        min_value: f64,
        /// Upper bound.
        max_value: f64,
    },
    /// Set membership by exact string match.
    Categorical {
        /// Allowed values.
        allowed_values: Vec<String>,
    },
    /// Anchored full-value regex match.
    Pattern {
        /// Regular expression.
        pattern: String,
    },
}

impl RuleKind {
    /// Returns the kind label used in reports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Numeric { .. } => "numeric",
            Self::Categorical { .. } => "categorical",
            Self::Pattern { .. } => "pattern",
        }
    }
}

impl QualityRule {
    /// Creates a numeric range rule.
    pub fn numeric(field: impl Into<String>, min_value: f64, max_value: f64) -> Self {
        Self {
            field: field.into(),
            null_allowed: false,
            kind: RuleKind::Numeric {
                min_value,
                max_value,
            },
        }
    }

    /// Creates a categorical rule.
    pub fn categorical(
        field: impl Into<String>,
        allowed_values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            field: field.into(),
            null_allowed: false,
            kind: RuleKind::Categorical {
                allowed_values: allowed_values.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Creates a pattern rule.
    pub fn pattern(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            null_allowed: false,
            kind: RuleKind::Pattern {
                pattern: pattern.into(),
            },
        }
    }

    /// Allows nulls.
    #[must_use]
    pub fn allow_null(mut self) -> Self {
        self.null_allowed = true;
        self
    }
}

/// A rule compiled for evaluation.
pub struct CompiledRule {
    rule: QualityRule,
    regex: Option<Regex>,
}

impl CompiledRule {
    /// Compiles a rule; pattern rules are anchored to the whole value.
    pub fn compile(rule: QualityRule) -> QualityResult<Self> {
        let regex = match &rule.kind {
            RuleKind::Pattern { pattern } => Some(Regex::new(&format!("^(?:{pattern})$"))?),
            _ => None,
        };
        Ok(Self { rule, regex })
    }

    /// Returns the underlying rule.
    #[must_use]
    pub fn rule(&self) -> &QualityRule {
        &self.rule
    }

    /// Evaluates a single cell against the rule.
    #[must_use]
    pub fn evaluate(&self, cell: &Cell) -> bool {
        if cell.is_null() {
            return self.rule.null_allowed;
        }
        match &self.rule.kind {
            RuleKind::Numeric {
                min_value,
                max_value,
            } => cell
                .as_number()
                .is_some_and(|n| n >= *min_value && n <= *max_value),
            RuleKind::Categorical { allowed_values } => {
                let value = cell.to_string();
                allowed_values.iter().any(|a| a == &value)
            }
            RuleKind::Pattern { .. } => {
                let value = cell.to_string();
                self.regex.as_ref().is_some_and(|r| r.is_match(&value))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(rule: QualityRule, cell: Cell) -> bool {
        CompiledRule::compile(rule).unwrap().evaluate(&cell)
    }

    #[test]
    fn test_numeric_range() {
        let rule = || QualityRule::numeric("gpa", 0.0, 4.0);
        assert!(eval(rule(), Cell::Number(3.85)));
        assert!(!eval(rule(), Cell::Number(4.5)));
        assert!(eval(rule(), Cell::Text("4.00".into())));
        assert!(!eval(rule(), Cell::Text("not a number".into())));
    }

    #[test]
    fn test_numeric_null_handling() {
        assert!(eval(
            QualityRule::numeric("gpa", 0.0, 4.0).allow_null(),
            Cell::Null
        ));
        assert!(!eval(QualityRule::numeric("gpa", 0.0, 4.0), Cell::Null));
    }

    #[test]
    fn test_categorical_exact_match() {
        let rule = || QualityRule::categorical("status", ["ACTIVE", "GRADUATED"]);
        assert!(eval(rule(), Cell::Text("ACTIVE".into())));
        assert!(!eval(rule(), Cell::Text("active".into())));
        assert!(!eval(rule(), Cell::Text("WITHDRAWN".into())));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let rule = || QualityRule::pattern("student_id", r"[A-Z]{2}\d{8}");
        assert!(eval(rule(), Cell::Text("AB12345678".into())));
        assert!(!eval(rule(), Cell::Text("invalid".into())));
        assert!(!eval(rule(), Cell::Text("xAB12345678x".into())));
    }

    #[test]
    fn test_rule_yaml_shape() {
        let yaml = r#"
- type: numeric
  field: gpa
  min_value: 0.0
  max_value: 4.0
  null_allowed: false
- type: categorical
  field: enrollment_status
  allowed_values: [ACTIVE, GRADUATED, WITHDRAWN]
  null_allowed: true
- type: pattern
  field: student_id
  pattern: "^[A-Z]{2}\\d{8}$"
"#;
        let rules: Vec<QualityRule> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].kind.label(), "numeric");
        assert!(rules[1].null_allowed);
        assert_eq!(rules[2].field, "student_id");
    }
}
