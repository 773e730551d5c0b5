//! Storage - Backend Trait and Implementations
//!
//! TigerStyle: Raw persistence only. Duplicate detection and version checks
//! belong to the store façade, so backends stay swappable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    StorageBackend Trait                      │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                              ↑
//!          │                              │
//! ┌────────┴────────┐           ┌────────┴────────┐
//! │ InMemoryBackend │           │CassandraBackend │
//! │   (default)     │           │  (distributed)  │
//! └─────────────────┘           └─────────────────┘
//! ```
//!
//! [`open_backend`] picks the variant from configuration once, at startup.

mod backend;
mod error;
mod memory;
mod select;

#[cfg(feature = "cassandra")]
mod cassandra;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryBackend;
pub use select::open_backend;

#[cfg(feature = "cassandra")]
pub use cassandra::CassandraBackend;
