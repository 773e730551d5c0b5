//! StorageBackend trait

use async_trait::async_trait;

use super::error::StorageResult;
use crate::resource::Resource;

/// Raw persistence of resources keyed by id.
///
/// Implementations perform no business rules: no duplicate detection, no
/// version checks. They must be `Send + Sync` to be shared across request
/// tasks.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short name for logs (`"memory"`, `"cassandra"`).
    fn name(&self) -> &'static str;

    /// Persist a new resource.
    async fn create(&self, resource: &Resource) -> StorageResult<()>;

    /// Fetch a resource by id. `Ok(None)` when absent.
    async fn get(&self, id: &str) -> StorageResult<Option<Resource>>;

    /// Overwrite the resource with the same id.
    async fn update(&self, resource: &Resource) -> StorageResult<()>;

    /// Remove a resource. Absent ids are a no-op, never an error.
    async fn delete(&self, id: &str) -> StorageResult<()>;

    /// Every stored resource, in no particular order.
    async fn list(&self) -> StorageResult<Vec<Resource>>;
}
