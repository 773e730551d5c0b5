//! TigerStyle Constants
//!
//! Every limit and default lives here, named with its unit last.

use std::time::Duration;

// =============================================================================
// Store
// =============================================================================

/// Attempts at drawing a version token that differs from the previous one.
pub const VERSION_REGENERATE_ATTEMPTS_MAX: usize = 3;

// =============================================================================
// Configuration keys
// =============================================================================

/// Presence of this key selects the Cassandra backend.
pub const ENV_CASSANDRA_KEYSPACE: &str = "CASSANDRA_KEYSPACE";

/// Contact point, `host` or `host:port`.
pub const ENV_CASSANDRA_HOSTNAME: &str = "CASSANDRA_HOSTNAME";

/// Username for password authentication.
pub const ENV_CASSANDRA_USERNAME: &str = "CASSANDRA_USERNAME";

/// Password for password authentication.
pub const ENV_CASSANDRA_PASSWORD: &str = "CASSANDRA_PASSWORD";

/// Per-attempt connection timeout, in seconds.
pub const ENV_CASSANDRA_CONNECT_TIMEOUT_SECS: &str = "CASSANDRA_CONNECT_TIMEOUT_SECS";

/// Connection retries after the first failed attempt.
pub const ENV_CASSANDRA_RECONNECT_MAX_RETRIES: &str = "CASSANDRA_RECONNECT_MAX_RETRIES";

/// Fixed back-off between connection attempts, in seconds.
pub const ENV_CASSANDRA_RECONNECT_INTERVAL_SECS: &str = "CASSANDRA_RECONNECT_INTERVAL_SECS";

/// Per-request timeout, in seconds.
pub const ENV_CASSANDRA_REQUEST_TIMEOUT_SECS: &str = "CASSANDRA_REQUEST_TIMEOUT_SECS";

// =============================================================================
// Cassandra defaults
// =============================================================================

/// Default CQL native protocol port, appended when the hostname has none.
pub const CASSANDRA_PORT_DEFAULT: u16 = 9042;

/// Default per-attempt connection timeout.
pub const CASSANDRA_CONNECT_TIMEOUT_DEFAULT: Duration = Duration::from_secs(10);

/// Default number of connection retries.
pub const CASSANDRA_RECONNECT_MAX_RETRIES_DEFAULT: u32 = 10;

/// Upper bound on configured connection retries.
pub const CASSANDRA_RECONNECT_MAX_RETRIES_MAX: u32 = 1_000;

/// Default fixed back-off between connection attempts.
pub const CASSANDRA_RECONNECT_INTERVAL_DEFAULT: Duration = Duration::from_secs(30);

/// Default per-request timeout.
pub const CASSANDRA_REQUEST_TIMEOUT_DEFAULT: Duration = Duration::from_secs(10);

/// Table holding one row per resource.
pub const CASSANDRA_TABLE_NAME: &str = "resources";

// =============================================================================
// Simulation
// =============================================================================

/// Milliseconds per second
pub const TIME_MS_PER_SEC: u64 = 1_000;

/// Largest single step a simulated clock may take (one day).
pub const DST_TIME_ADVANCE_MS_MAX: u64 = 86_400 * TIME_MS_PER_SEC;
