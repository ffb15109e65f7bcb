//! Object-store collaborator for the lakegov toolkit.
//!
//! Lineage records, validation reports, and batch job input/output all move
//! through the [`ObjectStore`] trait so components can be constructed
//! against an in-memory fake in tests and against S3 in production.

pub mod backend;
pub mod error;

pub use backend::filesystem::FilesystemStore;
pub use backend::memory::InMemoryStore;
pub use backend::s3::{S3Config, S3Store};
pub use backend::ObjectStore;
pub use error::{StoreError, StoreResult};
