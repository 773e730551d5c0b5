//! Resource - The versioned catalog record
//!
//! TigerStyle: Explicit fields, store-owned metadata kept apart from
//! caller-supplied fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Resource Fields
// =============================================================================

/// The part of a resource a caller is allowed to supply.
///
/// `id`, `version` and both timestamps are owned by the store and therefore
/// absent here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFields {
    /// Free-text title
    pub title: String,
    /// Authors, in display order
    #[serde(default)]
    pub authors: Vec<String>,
    /// Publication year
    pub year: i32,
    /// Caller comment, opaque to the store
    #[serde(default)]
    pub comment: String,
}

impl ResourceFields {
    /// Create fields with an empty comment.
    #[must_use]
    pub fn new(title: impl Into<String>, authors: Vec<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            authors,
            year,
            comment: String::new(),
        }
    }

    /// Set the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

// =============================================================================
// Resource
// =============================================================================

/// A stored, versioned resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Primary key, assigned once at creation
    pub id: String,
    /// Free-text title
    pub title: String,
    /// Authors, in display order
    pub authors: Vec<String>,
    /// Publication year
    pub year: i32,
    /// Concurrency token, replaced on every successful write
    pub version: String,
    /// Set on create, never changed afterwards
    pub creation_time: DateTime<Utc>,
    /// Set on create and on every update
    pub last_update_time: DateTime<Utc>,
    /// Caller comment, opaque to the store
    pub comment: String,
}

impl Resource {
    /// Build a freshly created resource.
    ///
    /// # Panics
    /// Panics if `id` or `version` is empty.
    #[must_use]
    pub fn create(id: String, version: String, now: DateTime<Utc>, fields: ResourceFields) -> Self {
        // Preconditions
        assert!(!id.is_empty(), "id cannot be empty");
        assert!(!version.is_empty(), "version cannot be empty");

        Self {
            id,
            title: fields.title,
            authors: fields.authors,
            year: fields.year,
            version,
            creation_time: now,
            last_update_time: now,
            comment: fields.comment,
        }
    }

    /// Produce the next state of this resource.
    ///
    /// Caller fields overwrite the prior ones; `id` and `creation_time` are
    /// kept. `last_update_time` never drops below `creation_time`, even if
    /// the clock stepped backwards.
    ///
    /// # Panics
    /// Panics if `version` is empty or equal to the current version.
    #[must_use]
    pub fn next(&self, version: String, now: DateTime<Utc>, fields: ResourceFields) -> Self {
        // Preconditions
        assert!(!version.is_empty(), "version cannot be empty");
        assert_ne!(version, self.version, "version must change on update");

        let next = Self {
            id: self.id.clone(),
            title: fields.title,
            authors: fields.authors,
            year: fields.year,
            version,
            creation_time: self.creation_time,
            last_update_time: now.max(self.creation_time),
            comment: fields.comment,
        };

        // Postcondition
        assert!(
            next.creation_time <= next.last_update_time,
            "creation_time must not exceed last_update_time"
        );

        next
    }

    /// The caller-supplied part of this resource.
    #[must_use]
    pub fn fields(&self) -> ResourceFields {
        ResourceFields {
            title: self.title.clone(),
            authors: self.authors.clone(),
            year: self.year,
            comment: self.comment.clone(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
