//! ResourceStore - The public CRUD contract
//!
//! TigerStyle: Business rules live here, once, above any backend.
//!
//! ```text
//! caller ─▶ ResourceStore ─▶ Duplicate Detector (create)
//!                         ─▶ Concurrency Guard  (update, delete)
//!                         ─▶ StorageBackend
//! ```
//!
//! # Known race
//!
//! `create` scans for duplicates and then inserts; the two steps are not
//! atomic. Two concurrent creates of the same entry can both pass the scan
//! and both persist. [`ResourceStore::with_serialized_creates`] closes the
//! race within one process; across processes it stays open.
//!
//! Mutating calls are never retried here: a retried write whose first
//! attempt actually landed would apply twice.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::constants::VERSION_REGENERATE_ATTEMPTS_MAX;
use crate::duplicate::find_duplicate;
use crate::error::{StoreError, StoreResult};
use crate::guard::ConcurrencyGuard;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::resource::{Resource, ResourceFields};
use crate::storage::{StorageBackend, StorageError};

/// Versioned resource store over a pluggable backend.
pub struct ResourceStore {
    backend: Arc<dyn StorageBackend>,
    ids: Arc<dyn IdGenerator>,
    versions: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    guard: ConcurrencyGuard,
    create_gate: Option<Mutex<()>>,
}

impl ResourceStore {
    /// Create a store with uuid ids/versions and the system clock.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            ids: Arc::new(UuidGenerator),
            versions: Arc::new(UuidGenerator),
            clock: Arc::new(SystemClock),
            guard: ConcurrencyGuard::new(),
            create_gate: None,
        }
    }

    /// Use `ids` for resource identifiers.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Use `versions` for version tokens.
    #[must_use]
    pub fn with_version_generator(mut self, versions: Arc<dyn IdGenerator>) -> Self {
        self.versions = versions;
        self
    }

    /// Use `clock` for creation and update timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Serialize `create` calls so the duplicate scan and the insert happen
    /// without another create in between. Only effective within this
    /// process.
    #[must_use]
    pub fn with_serialized_creates(mut self, enabled: bool) -> Self {
        self.create_gate = enabled.then(|| Mutex::new(()));
        self
    }

    /// Name of the backend in use.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Create a resource unless an existing one is a duplicate.
    ///
    /// # Errors
    /// [`StoreError::AlreadyExists`] with the existing resource's id, or
    /// [`StoreError::Storage`] if the backend fails.
    pub async fn create(&self, fields: ResourceFields) -> StoreResult<Resource> {
        let _gate = match &self.create_gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        let existing = self.backend.list().await?;
        if let Some(duplicate) = find_duplicate(&fields, &existing) {
            tracing::warn!(
                existing_id = %duplicate.id,
                title = %fields.title,
                "Rejected create: duplicate of existing resource"
            );
            return Err(StoreError::AlreadyExists {
                id: duplicate.id.clone(),
            });
        }

        let id = self.ids.new_id();
        let version = self.versions.new_id();
        if id.is_empty() || version.is_empty() {
            return Err(StorageError::internal("id generator returned an empty token").into());
        }

        let resource = Resource::create(id, version, self.clock.now(), fields);
        self.backend.create(&resource).await?;

        tracing::debug!(id = %resource.id, version = %resource.version, "Created resource");
        Ok(resource)
    }

    /// Fetch a resource by id.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if absent, [`StoreError::Storage`] if the
    /// backend fails.
    pub async fn get(&self, id: &str) -> StoreResult<Resource> {
        if id.is_empty() {
            return Err(StoreError::NotFound { id: String::new() });
        }
        self.backend
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    /// Every live resource, in no particular order.
    ///
    /// # Errors
    /// [`StoreError::Storage`] if the backend fails.
    pub async fn list(&self) -> StoreResult<Vec<Resource>> {
        Ok(self.backend.list().await?)
    }

    /// Replace the caller fields of a resource, if `version` is current.
    ///
    /// # Errors
    /// [`StoreError::NotFound`], [`StoreError::VersionMismatch`] or
    /// [`StoreError::Storage`].
    pub async fn update(&self, id: &str, version: &str, fields: ResourceFields) -> StoreResult<Resource> {
        if id.is_empty() {
            return Err(StoreError::NotFound { id: String::new() });
        }
        let _lock = self.guard.lock(id).await;

        let current = self.get(id).await?;
        self.check_version(version, &current)?;

        let next_version = self.fresh_version(&current.version)?;
        let updated = current.next(next_version, self.clock.now(), fields);
        self.backend.update(&updated).await?;

        // Postcondition
        assert_ne!(updated.version, current.version, "version must change on update");

        tracing::debug!(id = %updated.id, version = %updated.version, "Updated resource");
        Ok(updated)
    }

    /// Remove a resource, if `version` is current.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] (also for ids that never existed),
    /// [`StoreError::VersionMismatch`] or [`StoreError::Storage`].
    pub async fn delete(&self, id: &str, version: &str) -> StoreResult<()> {
        if id.is_empty() {
            return Err(StoreError::NotFound { id: String::new() });
        }
        let _lock = self.guard.lock(id).await;

        let current = self.get(id).await?;
        self.check_version(version, &current)?;

        self.backend.delete(id).await?;

        tracing::debug!(id, "Deleted resource");
        Ok(())
    }

    fn check_version(&self, supplied: &str, current: &Resource) -> StoreResult<()> {
        ConcurrencyGuard::check(supplied, current).map_err(|e| {
            tracing::warn!(
                id = %current.id,
                supplied,
                current = %current.version,
                backend = self.backend.name(),
                "Rejected mutation: stale version"
            );
            e
        })
    }

    /// Draw a version token different from `previous`.
    fn fresh_version(&self, previous: &str) -> StoreResult<String> {
        for _ in 0..VERSION_REGENERATE_ATTEMPTS_MAX {
            let version = self.versions.new_id();
            if !version.is_empty() && version != previous {
                return Ok(version);
            }
        }
        Err(StorageError::internal(format!(
            "version generator repeated {previous:?} {VERSION_REGENERATE_ATTEMPTS_MAX} times"
        ))
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::storage::InMemoryBackend;

    struct StuckIds;

    impl IdGenerator for StuckIds {
        fn new_id(&self) -> String {
            "same".to_string()
        }
    }

    struct EmptyIds;

    impl IdGenerator for EmptyIds {
        fn new_id(&self) -> String {
            String::new()
        }
    }

    fn dune() -> ResourceFields {
        ResourceFields::new("Dune", vec!["Frank Herbert".into()], 1965)
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = ResourceStore::new(Arc::new(InMemoryBackend::new()));
        assert_eq!(
            store.get("nope").await,
            Err(StoreError::NotFound { id: "nope".into() })
        );
    }

    #[tokio::test]
    async fn test_stuck_version_generator_is_an_error() {
        let store = ResourceStore::new(Arc::new(InMemoryBackend::new()))
            .with_id_generator(Arc::new(SequentialIds::new("b")))
            .with_version_generator(Arc::new(StuckIds));

        let created = store.create(dune()).await.unwrap();
        let result = store.update(&created.id, &created.version, dune()).await;

        assert!(matches!(result, Err(StoreError::Storage(StorageError::Internal { .. }))));
        // State untouched
        assert_eq!(store.get(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_empty_generated_id_is_an_error() {
        let store = ResourceStore::new(Arc::new(InMemoryBackend::new())).with_id_generator(Arc::new(EmptyIds));

        let result = store.create(dune()).await;

        assert!(matches!(result, Err(StoreError::Storage(StorageError::Internal { .. }))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_generated_version_is_an_error() {
        let store = ResourceStore::new(Arc::new(InMemoryBackend::new()))
            .with_id_generator(Arc::new(SequentialIds::new("b")))
            .with_version_generator(Arc::new(EmptyIds));

        let result = store.create(dune()).await;

        assert!(matches!(result, Err(StoreError::Storage(StorageError::Internal { .. }))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_id_is_not_found() {
        let store = ResourceStore::new(Arc::new(InMemoryBackend::new()));
        let missing = Err(StoreError::NotFound { id: String::new() });

        assert_eq!(store.get("").await, missing);
        assert_eq!(store.update("", "v1", dune()).await, missing);
        assert_eq!(store.delete("", "v1").await, Err(StoreError::NotFound { id: String::new() }));
    }

    #[tokio::test]
    async fn test_backend_name() {
        let store = ResourceStore::new(Arc::new(InMemoryBackend::new()));
        assert_eq!(store.backend_name(), "memory");
    }
}
