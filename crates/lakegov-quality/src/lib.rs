//! Declarative record-level data-quality validation.
//!
//! A [`RuleSuite`] is loaded from configuration and armed into a
//! [`QualityEngine`]; validating a frame yields a [`QualityReport`] with
//! per-rule outcomes and aggregate statistics. Failing data is a normal
//! report with `success = false`, never an error — errors are reserved for
//! misconfiguration.

pub mod engine;
pub mod error;
pub mod report;
pub mod rule;

pub use engine::{BoundSuite, QualityEngine, RuleSuite};
pub use error::{QualityError, QualityResult};
pub use report::{QualityReport, RuleOutcome, SchemaOutcome, ValidationStats};
pub use rule::{CompiledRule, QualityRule, RuleKind};
