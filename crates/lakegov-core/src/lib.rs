//! Core data model for the lakegov data-governance toolkit.
//!
//! This crate defines the types shared across the governance components:
//! privacy classifications, the tabular [`Frame`] that quality rules and
//! batch transforms operate on, and the core error taxonomy.

pub mod classification;
pub mod error;
pub mod frame;

pub use classification::{FieldClassification, PrivacyLevel};
pub use error::{CoreError, CoreResult};
pub use frame::{Cell, Frame};
