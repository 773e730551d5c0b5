//! InMemoryBackend - Process-lifetime storage
//!
//! TigerStyle: The map is owned by the backend and only touched under its
//! lock; nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::backend::StorageBackend;
use super::error::StorageResult;
use crate::resource::Resource;

/// Storage backed by a `HashMap` behind a reader/writer lock.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    /// Resources by id
    resources: RwLock<HashMap<String, Resource>>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored resources.
    pub async fn len(&self) -> usize {
        self.resources.read().await.len()
    }

    /// Whether the backend holds no resources.
    pub async fn is_empty(&self) -> bool {
        self.resources.read().await.is_empty()
    }

    async fn put(&self, resource: &Resource) {
        // Precondition
        assert!(!resource.id.is_empty(), "resource must have id");

        self.resources
            .write()
            .await
            .insert(resource.id.clone(), resource.clone());
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, resource: &Resource) -> StorageResult<()> {
        self.put(resource).await;
        Ok(())
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Resource>> {
        Ok(self.resources.read().await.get(id).cloned())
    }

    async fn update(&self, resource: &Resource) -> StorageResult<()> {
        self.put(resource).await;
        Ok(())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.resources.write().await.remove(id);
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<Resource>> {
        Ok(self.resources.read().await.values().cloned().collect())
    }
}
