//! Rule suite and validation engine.

use crate::report::{QualityReport, RuleOutcome, SchemaOutcome, ValidationStats};
use crate::rule::{CompiledRule, QualityRule};
use crate::{QualityError, QualityResult};
use lakegov_core::{Cell, Frame};

/// An ordered, compiled set of quality rules.
pub struct RuleSuite {
    rules: Vec<CompiledRule>,
    expected_columns: Option<Vec<String>>,
}

impl RuleSuite {
    /// Compiles a suite from declarative rules.
    pub fn compile(rules: Vec<QualityRule>) -> QualityResult<Self> {
        let rules = rules
            .into_iter()
            .map(CompiledRule::compile)
            .collect::<QualityResult<Vec<_>>>()?;
        Ok(Self {
            rules,
            expected_columns: None,
        })
    }

    /// Requires the frame's columns to match this ordered list exactly.
    #[must_use]
    pub fn with_expected_columns(
        mut self,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.expected_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the compiled rules in suite order.
    #[must_use]
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Binds the suite's columns to a frame for row-wise evaluation.
    ///
    /// A rule referencing a column the frame does not have is a
    /// configuration error.
    pub fn bind<'a>(&'a self, frame: &Frame) -> QualityResult<BoundSuite<'a>> {
        let indexes = self
            .rules
            .iter()
            .map(|r| {
                frame.column_index(&r.rule().field).map_err(|_| {
                    QualityError::Configuration(format!(
                        "rule references unknown column '{}'",
                        r.rule().field
                    ))
                })
            })
            .collect::<QualityResult<Vec<_>>>()?;
        Ok(BoundSuite {
            suite: self,
            indexes,
        })
    }
}

/// A suite bound to a frame's column layout.
pub struct BoundSuite<'a> {
    suite: &'a RuleSuite,
    indexes: Vec<usize>,
}

impl BoundSuite<'_> {
    /// Returns true if every rule passes for this row.
    ///
    /// Pure and row-independent, so the hosting engine may evaluate rows in
    /// any order or in parallel.
    #[must_use]
    pub fn row_passes(&self, row: &[Cell]) -> bool {
        self.suite
            .rules
            .iter()
            .zip(&self.indexes)
            .all(|(rule, &idx)| rule.evaluate(&row[idx]))
    }
}

/// Validation engine. Must be armed with a [`RuleSuite`] before use.
#[derive(Default)]
pub struct QualityEngine {
    suite: Option<RuleSuite>,
}

impl QualityEngine {
    /// Creates an unarmed engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine armed with the given rules.
    pub fn with_rules(rules: Vec<QualityRule>) -> QualityResult<Self> {
        Ok(Self {
            suite: Some(RuleSuite::compile(rules)?),
        })
    }

    /// Arms the engine with a suite.
    pub fn arm(&mut self, suite: RuleSuite) {
        self.suite = Some(suite);
    }

    /// Returns the armed suite, or the not-configured error.
    pub fn suite(&self) -> QualityResult<&RuleSuite> {
        self.suite.as_ref().ok_or(QualityError::SuiteNotConfigured)
    }

    /// Validates a frame against the armed suite.
    ///
    /// Rule failures come back in the report with `success = false`;
    /// invoking an unarmed engine is an error.
    pub fn validate(&self, frame: &Frame) -> QualityResult<QualityReport> {
        let suite = self.suite()?;

        let schema = suite.expected_columns.as_ref().map(|expected| {
            let actual = frame.columns().to_vec();
            let passed = expected == &actual;
            if !passed {
                tracing::warn!(?expected, ?actual, "column layout mismatch");
            }
            SchemaOutcome {
                expected: expected.clone(),
                actual,
                passed,
            }
        });

        let bound = suite.bind(frame)?;
        let mut outcomes = Vec::with_capacity(suite.rules.len());
        let mut checks_failed = 0usize;

        for (rule, &idx) in suite.rules.iter().zip(&bound.indexes) {
            let failing_values = frame
                .rows()
                .iter()
                .filter(|row| !rule.evaluate(&row[idx]))
                .count();
            if failing_values > 0 {
                tracing::warn!(
                    column = %rule.rule().field,
                    rule_type = rule.rule().kind.label(),
                    failing_values,
                    "quality rule failed"
                );
            }
            checks_failed += failing_values;
            outcomes.push(RuleOutcome {
                column: rule.rule().field.clone(),
                rule_type: rule.rule().kind.label().to_string(),
                passed: failing_values == 0,
                failing_values,
            });
        }

        let checks_evaluated = suite.rules.len() * frame.row_count();
        let success_percent = if checks_evaluated == 0 {
            100.0
        } else {
            100.0 * (checks_evaluated - checks_failed) as f64 / checks_evaluated as f64
        };

        let success =
            outcomes.iter().all(|o| o.passed) && schema.as_ref().map_or(true, |s| s.passed);

        Ok(QualityReport {
            success,
            schema,
            outcomes,
            stats: ValidationStats {
                rows_evaluated: frame.row_count(),
                checks_evaluated,
                checks_failed,
                success_percent,
            },
        })
    }
}
