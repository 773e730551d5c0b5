//! Identifier generation
//!
//! Ids and version tokens come from an injected [`IdGenerator`]. Uniqueness
//! is practical, not proven.

use std::sync::atomic::{AtomicU64, Ordering};

/// Produces opaque, practically unique strings.
pub trait IdGenerator: Send + Sync {
    /// Draw a new identifier.
    fn new_id(&self) -> String;
}

/// Random UUID v4 strings. The default for both ids and versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix1`, `prefix2`, ... sequence.
///
/// Predictable, so only for tests and demos: production version tokens must
/// not be guessable.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    /// Start a sequence at `prefix1`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_differ() {
        let ids = UuidGenerator;
        let a = ids.new_id();
        let b = ids.new_id();

        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("b");

        assert_eq!(ids.new_id(), "b1");
        assert_eq!(ids.new_id(), "b2");
        assert_eq!(ids.new_id(), "b3");
    }
}
