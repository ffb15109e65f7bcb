//! Object-store backend trait and implementations.

pub mod filesystem;
pub mod memory;
pub mod s3;

use crate::StoreResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Narrow object-store seam used for lineage, reports, and job data.
///
/// Calls are blocking from the caller's perspective: there is no retry,
/// timeout, or cancellation logic anywhere in the toolkit, so any transient
/// backend failure surfaces immediately as an error.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the backend name.
    fn name(&self) -> &str;

    /// Stores data at the given key, overwriting any existing object.
    async fn put(&self, key: &str, data: Bytes) -> StoreResult<()>;

    /// Retrieves data by key.
    async fn get(&self, key: &str) -> StoreResult<Bytes>;

    /// Deletes data by key; deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Checks if a key exists.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Lists keys with an optional prefix, in unspecified order.
    async fn list(&self, prefix: Option<&str>) -> StoreResult<Vec<String>>;
}
