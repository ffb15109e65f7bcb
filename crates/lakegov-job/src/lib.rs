//! Batch transformation job.
//!
//! The only component that composes the toolkit end-to-end: read raw CSV
//! from the object store, drop rows failing the quality rules, mask
//! sensitive columns, tag columns with governance metadata, write
//! partitioned output, and record one lineage fact.
//!
//! Every per-row transform here is a pure function of that row, so the
//! hosting engine may split and reorder rows freely; the optional `rayon`
//! feature evaluates the quality filter in parallel as a demonstration.

pub mod error;
pub mod masking;
pub mod runner;
pub mod tags;

pub use error::{JobError, JobResult};
pub use masking::{apply_masking, MaskingRule, MaskingType};
pub use runner::{JobConfig, JobOutcome, TransformJob};
pub use tags::{add_pii_tags, add_quality_tags};
