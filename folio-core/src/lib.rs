//! Folio Core - Versioned Resource Store
//!
//! TigerStyle: one mutation contract, many storage media.
//!
//! Folio keeps a catalog of uniquely identified resources and guards every
//! mutation with an opaque version token (optimistic concurrency control).
//! Business rules live in the [`ResourceStore`] façade; storage backends are
//! plain persistence and can be swapped without touching those rules.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               ResourceStore                  │
//! ├──────────────────────┬──────────────────────┤
//! │  Duplicate Detector  │  Concurrency Guard   │
//! ├──────────────────────┴──────────────────────┤
//! │          StorageBackend (trait)              │
//! ├──────────────────────┬──────────────────────┤
//! │  InMemoryBackend     │  CassandraBackend    │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use folio_core::{InMemoryBackend, ResourceFields, ResourceStore};
//!
//! # tokio_test::block_on(async {
//! let store = ResourceStore::new(Arc::new(InMemoryBackend::new()));
//!
//! let created = store
//!     .create(ResourceFields::new("Dune", vec!["Frank Herbert".into()], 1965))
//!     .await
//!     .unwrap();
//!
//! let fetched = store.get(&created.id).await.unwrap();
//! assert_eq!(fetched, created);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod config;
pub mod constants;
pub mod duplicate;
pub mod error;
pub mod guard;
pub mod ids;
pub mod resource;
pub mod storage;
pub mod store;

// Re-export common types
pub use clock::{Clock, SimClock, SystemClock};
pub use config::{BackendConfig, CassandraConfig, ConfigError};
pub use constants::*;
pub use duplicate::{find_duplicate, is_duplicate};
pub use error::{StoreError, StoreResult};
pub use guard::{ConcurrencyGuard, IdLockGuard};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use resource::{Resource, ResourceFields};
pub use storage::{open_backend, InMemoryBackend, StorageBackend, StorageError, StorageResult};
pub use store::ResourceStore;

#[cfg(feature = "cassandra")]
pub use storage::CassandraBackend;
