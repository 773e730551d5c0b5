//! Concurrency Guard
//!
//! TigerStyle: Optimistic concurrency on an opaque token.
//!
//! A mutation proceeds iff the caller's token equals the stored one, by
//! plain string equality. Tokens carry no order and no time.
//!
//! The read-check-write sequence in the store is only race-free if it is
//! serialized per id, so the guard also hands out per-id async locks. They
//! serialize callers inside one process; across processes the distributed
//! store's own consistency applies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::error::{StoreError, StoreResult};
use crate::resource::Resource;

type LockTable = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Version-token comparison plus per-id mutation locks.
#[derive(Debug, Default)]
pub struct ConcurrencyGuard {
    locks: LockTable,
}

impl ConcurrencyGuard {
    /// Create a guard with no held locks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow the mutation only if `supplied` is the current version.
    ///
    /// # Errors
    /// Returns [`StoreError::VersionMismatch`] carrying both tokens.
    pub fn check(supplied: &str, current: &Resource) -> StoreResult<()> {
        if supplied == current.version {
            Ok(())
        } else {
            Err(StoreError::VersionMismatch {
                supplied: supplied.to_string(),
                current: current.version.clone(),
            })
        }
    }

    /// Wait for exclusive mutation rights on `id`.
    ///
    /// Released when the returned guard drops.
    pub async fn lock(&self, id: &str) -> IdLockGuard {
        // Precondition
        assert!(!id.is_empty(), "id cannot be empty");

        let slot = {
            let mut table = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            table.entry(id.to_string()).or_default().clone()
        };

        let held = slot.lock_owned().await;

        IdLockGuard {
            id: id.to_string(),
            table: Arc::clone(&self.locks),
            held: Some(held),
        }
    }

    /// Number of ids with a live lock entry.
    #[must_use]
    pub fn active_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Exclusive mutation rights on one id.
#[derive(Debug)]
pub struct IdLockGuard {
    id: String,
    table: LockTable,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdLockGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let held = self.held.take();

        // The table and this guard hold one reference each; any more means
        // another caller is queued on the same id and still needs the slot.
        if let Some(slot) = table.get(&self.id) {
            if Arc::strong_count(slot) <= 2 {
                table.remove(&self.id);
            }
        }

        drop(held);
    }
}
