//! Validation reports.

use crate::QualityResult;
use bytes::Bytes;
use lakegov_store::ObjectStore;
use serde::{Deserialize, Serialize};

/// Outcome of one rule across the whole frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Column the rule applied to.
    pub column: String,
    /// Rule kind label.
    pub rule_type: String,
    /// Whether every evaluated value passed.
    pub passed: bool,
    /// Number of failing values.
    pub failing_values: usize,
}

/// Outcome of the expected-column check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaOutcome {
    /// Expected ordered column list.
    pub expected: Vec<String>,
    /// Actual frame columns.
    pub actual: Vec<String>,
    /// Whether they match exactly.
    pub passed: bool,
}

/// Aggregate validation statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Rows evaluated.
    pub rows_evaluated: usize,
    /// Individual rule-value checks evaluated.
    pub checks_evaluated: usize,
    /// Checks that failed.
    pub checks_failed: usize,
    /// Percentage of checks that passed.
    pub success_percent: f64,
}

/// Result of validating a frame against a rule suite.
///
/// Failing data is represented here as `success = false`; it is a value, not
/// an error, and callers decide whether to treat it as fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// True only if every check (and the schema check, if any) passed.
    pub success: bool,
    /// Expected-column outcome, when the suite declares one.
    pub schema: Option<SchemaOutcome>,
    /// Per-rule outcomes, in suite order.
    pub outcomes: Vec<RuleOutcome>,
    /// Aggregate statistics.
    pub stats: ValidationStats,
}

impl QualityReport {
    /// Returns the outcomes of failing rules.
    pub fn failures(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    /// Persists the report as JSON to the object store.
    pub async fn persist(&self, store: &dyn ObjectStore, key: &str) -> QualityResult<()> {
        let body = serde_json::to_vec_pretty(self)?;
        store.put(key, Bytes::from(body)).await?;
        Ok(())
    }
}
