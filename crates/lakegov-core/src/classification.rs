//! Privacy classification types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Privacy sensitivity level of a field.
///
/// Levels are ordered from least to most restrictive, so the most
/// restrictive of two levels is simply `a.max(b)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivacyLevel {
    /// Freely shareable.
    Public,
    /// Internal use only.
    Internal,
    /// Contains personal or otherwise sensitive information.
    Confidential,
    /// Industry-specific sensitive data; always masked.
    Restricted,
}

impl fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Public => "PUBLIC",
            Self::Internal => "INTERNAL",
            Self::Confidential => "CONFIDENTIAL",
            Self::Restricted => "RESTRICTED",
        };
        f.write_str(s)
    }
}

/// The result of classifying a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldClassification {
    /// Field name as given by the caller.
    pub field_name: String,
    /// Assigned privacy level.
    pub privacy_level: PrivacyLevel,
    /// Detected PII category, if any.
    pub pii_type: Option<String>,
    /// Whether the field must be masked before downstream use.
    pub masking_required: bool,
    /// Human-readable description of the classification.
    pub description: String,
}

impl FieldClassification {
    /// Creates the default classification for an unmatched field.
    pub fn standard(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            privacy_level: PrivacyLevel::Internal,
            pii_type: None,
            masking_required: false,
            description: "Standard field".to_string(),
        }
    }

    /// Creates a CONFIDENTIAL classification for a detected PII category.
    pub fn confidential(field_name: impl Into<String>, pii_type: impl Into<String>) -> Self {
        let pii_type = pii_type.into();
        let description = format!("Contains {} information", pii_type.to_uppercase());
        Self {
            field_name: field_name.into(),
            privacy_level: PrivacyLevel::Confidential,
            pii_type: Some(pii_type),
            masking_required: true,
            description,
        }
    }

    /// Applies the industry-specific override, forcing RESTRICTED and masking.
    #[must_use]
    pub fn restricted(mut self) -> Self {
        self.privacy_level = PrivacyLevel::Restricted;
        self.masking_required = true;
        self.description = "Industry-specific sensitive field".to_string();
        self
    }
}
