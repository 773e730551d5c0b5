//! CassandraBackend - Distributed wide-column storage
//!
//! TigerStyle: One network round-trip per call, no client-side cache.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CassandraBackend                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Session: scylla::Session (token-aware, pooled)              │
//! │  Writes:  QUORUM (session default)                           │
//! │  Reads:   ONE for get, paged full scan for list              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS resources (
//!     id text PRIMARY KEY,
//!     title text,
//!     authors list<text>,
//!     year int,
//!     version text,
//!     creation_time timestamp,
//!     last_update_time timestamp,
//!     comment text
//! );
//! ```
//!
//! Create and update are both upserts keyed by `id`; the store façade owns
//! the existence and version checks.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::StreamExt;
use scylla::frame::value::CqlTimestamp;
use scylla::query::Query;
use scylla::statement::Consistency;
use scylla::{ExecutionProfile, Session, SessionBuilder};

use super::backend::StorageBackend;
use super::error::{StorageError, StorageResult};
use crate::config::CassandraConfig;
use crate::constants::CASSANDRA_TABLE_NAME;
use crate::resource::Resource;

/// Column order shared by every SELECT and the row tuple below.
const COLUMNS: &str = "id, title, authors, year, version, creation_time, last_update_time, comment";

/// One row as read back from the table. Empty lists and unset text come
/// back as NULL.
type ResourceRow = (
    String,
    Option<String>,
    Option<Vec<String>>,
    Option<i32>,
    Option<String>,
    Option<CqlTimestamp>,
    Option<CqlTimestamp>,
    Option<String>,
);

// =============================================================================
// CassandraBackend
// =============================================================================

/// Cassandra (or ScyllaDB) storage backend.
pub struct CassandraBackend {
    session: Session,
}

impl CassandraBackend {
    /// Connect with the configured retry policy and prepare the schema.
    ///
    /// Connection establishment is attempted `1 + reconnect_max_retries`
    /// times, pausing `reconnect_interval` between attempts.
    ///
    /// # Errors
    /// Returns a connection error once every attempt failed, or an internal
    /// error if the table cannot be created.
    ///
    /// # Example
    /// ```ignore
    /// let config = CassandraConfig::new("localhost", "cassandra", "cassandra", "library");
    /// let backend = CassandraBackend::connect(&config).await?;
    /// ```
    pub async fn connect(config: &CassandraConfig) -> StorageResult<Self> {
        // Preconditions
        assert!(!config.hostname.is_empty(), "hostname cannot be empty");
        assert!(!config.keyspace.is_empty(), "keyspace cannot be empty");

        let attempts_max = config.reconnect_max_retries.saturating_add(1);
        let mut attempt = 0;

        let session = loop {
            attempt += 1;
            match Self::open_session(config).await {
                Ok(session) => break session,
                Err(e) if attempt < attempts_max => {
                    tracing::warn!(
                        host = %config.hostname,
                        attempt,
                        attempts_max,
                        error = %e,
                        "Cassandra connection failed, retrying in {:?}",
                        config.reconnect_interval
                    );
                    tokio::time::sleep(config.reconnect_interval).await;
                }
                Err(e) => {
                    return Err(StorageError::connection(format!(
                        "{} unreachable after {attempt} attempts: {e}",
                        config.hostname
                    )));
                }
            }
        };

        tracing::info!(host = %config.hostname, keyspace = %config.keyspace, "Connected to Cassandra");

        let backend = Self { session };
        backend.init_schema().await?;

        Ok(backend)
    }

    async fn open_session(config: &CassandraConfig) -> Result<Session, String> {
        let profile = ExecutionProfile::builder()
            .consistency(Consistency::Quorum)
            .request_timeout(Some(config.request_timeout))
            .build();

        SessionBuilder::new()
            .known_node(&config.hostname)
            .user(&config.username, &config.password)
            .connection_timeout(config.connect_timeout)
            .default_execution_profile_handle(profile.into_handle())
            .use_keyspace(&config.keyspace, false)
            .build()
            .await
            .map_err(|e| e.to_string())
    }

    /// Initialize the resources table.
    async fn init_schema(&self) -> StorageResult<()> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {CASSANDRA_TABLE_NAME} (
                id text PRIMARY KEY,
                title text,
                authors list<text>,
                year int,
                version text,
                creation_time timestamp,
                last_update_time timestamp,
                comment text
            )"
        );

        self.session
            .query(ddl, ())
            .await
            .map_err(|e| StorageError::internal(format!("failed to create schema: {e}")))?;

        Ok(())
    }

    /// Upsert the full row.
    async fn upsert(&self, resource: &Resource) -> StorageResult<()> {
        // Preconditions
        assert!(!resource.id.is_empty(), "resource must have id");
        assert!(!resource.version.is_empty(), "resource must have version");

        let insert = format!(
            "INSERT INTO {CASSANDRA_TABLE_NAME} ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        );

        self.session
            .query(
                insert,
                (
                    resource.id.as_str(),
                    resource.title.as_str(),
                    &resource.authors,
                    resource.year,
                    resource.version.as_str(),
                    to_cql(resource.creation_time),
                    to_cql(resource.last_update_time),
                    resource.comment.as_str(),
                ),
            )
            .await
            .map_err(|e| StorageError::write(format!("failed to store resource {}: {e}", resource.id)))?;

        Ok(())
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

fn to_cql(time: DateTime<Utc>) -> CqlTimestamp {
    CqlTimestamp(time.timestamp_millis())
}

fn from_cql(column: &str, time: Option<CqlTimestamp>) -> StorageResult<DateTime<Utc>> {
    let CqlTimestamp(ms) = time.ok_or_else(|| StorageError::internal(format!("{column} is null")))?;
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| StorageError::internal(format!("{column} out of range: {ms}")))
}

/// Parse a row tuple into a Resource.
fn row_to_resource(row: ResourceRow) -> StorageResult<Resource> {
    let (id, title, authors, year, version, creation_time, last_update_time, comment) = row;

    let year = year.ok_or_else(|| StorageError::internal(format!("resource {id}: year is null")))?;
    let version = version
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StorageError::internal(format!("resource {id}: version is null")))?;

    Ok(Resource {
        title: title.unwrap_or_default(),
        authors: authors.unwrap_or_default(),
        year,
        version,
        creation_time: from_cql("creation_time", creation_time)?,
        last_update_time: from_cql("last_update_time", last_update_time)?,
        comment: comment.unwrap_or_default(),
        id,
    })
}

// =============================================================================
// StorageBackend Implementation
// =============================================================================

#[async_trait]
impl StorageBackend for CassandraBackend {
    fn name(&self) -> &'static str {
        "cassandra"
    }

    async fn create(&self, resource: &Resource) -> StorageResult<()> {
        self.upsert(resource).await
    }

    /// Single-replica read: may be stale right after a write. The version
    /// token surfaces staleness to the caller.
    async fn get(&self, id: &str) -> StorageResult<Option<Resource>> {
        // Precondition
        assert!(!id.is_empty(), "id cannot be empty");

        let mut select = Query::new(format!(
            "SELECT {COLUMNS} FROM {CASSANDRA_TABLE_NAME} WHERE id = ? LIMIT 1"
        ));
        select.set_consistency(Consistency::One);

        let row = self
            .session
            .query(select, (id,))
            .await
            .map_err(|e| StorageError::read(format!("failed to get resource {id}: {e}")))?
            .maybe_first_row_typed::<ResourceRow>()
            .map_err(|e| StorageError::internal(format!("bad row for resource {id}: {e}")))?;

        match row {
            Some(row) => {
                let resource = row_to_resource(row)?;
                // Postcondition
                assert_eq!(resource.id, id, "returned resource must match requested id");
                Ok(Some(resource))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, resource: &Resource) -> StorageResult<()> {
        self.upsert(resource).await
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        // Precondition
        assert!(!id.is_empty(), "id cannot be empty");

        self.session
            .query(format!("DELETE FROM {CASSANDRA_TABLE_NAME} WHERE id = ?"), (id,))
            .await
            .map_err(|e| StorageError::write(format!("failed to delete resource {id}: {e}")))?;

        Ok(())
    }

    /// Full-table scan, paged by the driver. No limit.
    async fn list(&self) -> StorageResult<Vec<Resource>> {
        let mut rows = self
            .session
            .query_iter(format!("SELECT {COLUMNS} FROM {CASSANDRA_TABLE_NAME}"), ())
            .await
            .map_err(|e| StorageError::read(format!("failed to list resources: {e}")))?
            .into_typed::<ResourceRow>();

        let mut resources = Vec::new();
        while let Some(row) = rows.next().await {
            let row = row.map_err(|e| StorageError::read(format!("failed to list resources: {e}")))?;
            resources.push(row_to_resource(row)?);
        }

        Ok(resources)
    }
}

// =============================================================================
// Tests (require running Cassandra)
// =============================================================================
