//! Storage errors
//!
//! Every backend failure is transient from the caller's point of view: the
//! store surfaces it verbatim and never retries a mutating call.

/// Result alias for backend operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A backend failed to complete an operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Backend unreachable, or the connection was lost.
    #[error("storage connection error: {message}")]
    Connection {
        /// What went wrong
        message: String,
    },

    /// A read or scan failed.
    #[error("storage read error: {message}")]
    Read {
        /// What went wrong
        message: String,
    },

    /// A write or delete failed.
    #[error("storage write error: {message}")]
    Write {
        /// What went wrong
        message: String,
    },

    /// Unexpected failure (bad row, schema setup, exhausted invariants).
    #[error("storage internal error: {message}")]
    Internal {
        /// What went wrong
        message: String,
    },
}

impl StorageError {
    /// Connection failure.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Read failure.
    #[must_use]
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// Write failure.
    #[must_use]
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }

    /// Internal failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
