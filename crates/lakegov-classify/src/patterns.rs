//! PII pattern table.
//!
//! The table is an ordered list, not a map: iteration order decides which
//! category wins when several patterns match, so the builtin order
//! (ssn, email, phone, credit_card, then domain-specific patterns) is part
//! of the contract.

use crate::ClassifyResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Built-in pattern table shared by default-constructed classifiers.
pub static BUILTIN_PATTERNS: Lazy<PatternTable> = Lazy::new(PatternTable::builtin);

/// A PII matching rule: category name plus a value regex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiPattern {
    /// PII category name (also matched as a substring of field names).
    pub name: String,
    /// Regular expression matched against whole sample values.
    pub regex: String,
}

impl PiiPattern {
    /// Creates a new pattern.
    pub fn new(name: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regex: regex.into(),
        }
    }
}

/// A pattern compiled for anchored full-value matching.
pub struct CompiledPattern {
    pattern: PiiPattern,
    regex: Regex,
}

impl CompiledPattern {
    /// Compiles a pattern, anchoring it to the whole value.
    pub fn compile(pattern: PiiPattern) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern.regex))?;
        Ok(Self { pattern, regex })
    }

    /// Returns the PII category name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.pattern.name
    }

    /// Returns true if the whole value matches.
    #[must_use]
    pub fn matches_value(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Ordered set of PII patterns.
pub struct PatternTable {
    patterns: Vec<CompiledPattern>,
}

impl PatternTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Creates the builtin table. Order is significant.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.push_builtin(PiiPattern::new("ssn", r"\d{3}-?\d{2}-?\d{4}"));
        table.push_builtin(PiiPattern::new(
            "email",
            r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
        ));
        table.push_builtin(PiiPattern::new("phone", r"\+?1?\d{9,15}"));
        table.push_builtin(PiiPattern::new(
            "credit_card",
            r"\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}",
        ));
        table.push_builtin(PiiPattern::new("gpa", r"[0-4]\.\d{2}"));
        table
    }

    fn push_builtin(&mut self, pattern: PiiPattern) {
        match CompiledPattern::compile(pattern.clone()) {
            Ok(compiled) => self.patterns.push(compiled),
            Err(e) => {
                tracing::warn!("failed to compile builtin pattern '{}': {}", pattern.name, e);
            }
        }
    }

    /// Appends a pattern; a bad regex is a hard error so misconfiguration
    /// surfaces at construction time.
    pub fn add(&mut self, pattern: PiiPattern) -> ClassifyResult<()> {
        self.patterns.push(CompiledPattern::compile(pattern)?);
        Ok(())
    }

    /// Iterates patterns in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    /// Returns the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let names: Vec<&str> = BUILTIN_PATTERNS.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["ssn", "email", "phone", "credit_card", "gpa"]);
    }

    #[test]
    fn test_value_match_is_anchored() {
        let table = PatternTable::builtin();
        let ssn = table.iter().find(|p| p.name() == "ssn").unwrap();

        assert!(ssn.matches_value("123-45-6789"));
        assert!(ssn.matches_value("123456789"));
        assert!(!ssn.matches_value("id 123-45-6789 trailing"));
    }

    #[test]
    fn test_email_matches() {
        let table = PatternTable::builtin();
        let email = table.iter().find(|p| p.name() == "email").unwrap();
        assert!(email.matches_value("a@b.co"));
        assert!(!email.matches_value("not-an-email"));
    }

    #[test]
    fn test_invalid_custom_pattern_is_rejected() {
        let mut table = PatternTable::builtin();
        let err = table.add(PiiPattern::new("broken", "(unclosed"));
        assert!(err.is_err());
    }
}
