//! Store errors
//!
//! Business-rule failures are produced by the store itself; backend
//! failures pass through verbatim as [`StoreError::Storage`].

use crate::storage::StorageError;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Why a store operation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The candidate duplicates an existing resource.
    #[error("resource already exists with id: {id}")]
    AlreadyExists {
        /// Id of the existing resource
        id: String,
    },

    /// No live resource has this id.
    #[error("resource with id {id} was not found")]
    NotFound {
        /// Requested id
        id: String,
    },

    /// The supplied version token is not the current one.
    #[error("version mismatch: supplied {supplied:?}, current {current:?}")]
    VersionMismatch {
        /// Token the caller presented
        supplied: String,
        /// Token currently stored
        current: String,
    },

    /// The backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Whether retrying later with back-off may succeed.
    ///
    /// Only storage failures are transient; the rest need the caller to
    /// change the request.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_only_for_storage() {
        assert!(StoreError::from(StorageError::connection("down")).is_transient());
        assert!(!StoreError::NotFound { id: "x".into() }.is_transient());
        assert!(!StoreError::AlreadyExists { id: "x".into() }.is_transient());
        assert!(!StoreError::VersionMismatch {
            supplied: "a".into(),
            current: "b".into()
        }
        .is_transient());
    }

    #[test]
    fn test_storage_error_surfaces_verbatim() {
        let cause = StorageError::write("quorum not reached");
        let err = StoreError::from(cause.clone());

        assert_eq!(err.to_string(), cause.to_string());
        assert_eq!(err, StoreError::Storage(cause));
    }

    #[test]
    fn test_version_mismatch_message() {
        let err = StoreError::VersionMismatch {
            supplied: "v1".into(),
            current: "v2".into(),
        };
        assert_eq!(err.to_string(), r#"version mismatch: supplied "v1", current "v2""#);
    }
}
