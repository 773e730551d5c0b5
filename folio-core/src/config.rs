//! Backend configuration
//!
//! TigerStyle: Read once at startup from key/value lookup (process
//! environment in production). A missing keyspace means in-memory storage;
//! anything half-configured is a fatal [`ConfigError`].

use std::fmt;
use std::time::Duration;

use crate::constants::{
    CASSANDRA_CONNECT_TIMEOUT_DEFAULT, CASSANDRA_PORT_DEFAULT, CASSANDRA_RECONNECT_INTERVAL_DEFAULT,
    CASSANDRA_RECONNECT_MAX_RETRIES_DEFAULT, CASSANDRA_RECONNECT_MAX_RETRIES_MAX,
    CASSANDRA_REQUEST_TIMEOUT_DEFAULT, ENV_CASSANDRA_CONNECT_TIMEOUT_SECS, ENV_CASSANDRA_HOSTNAME,
    ENV_CASSANDRA_KEYSPACE, ENV_CASSANDRA_PASSWORD, ENV_CASSANDRA_RECONNECT_INTERVAL_SECS,
    ENV_CASSANDRA_RECONNECT_MAX_RETRIES, ENV_CASSANDRA_REQUEST_TIMEOUT_SECS, ENV_CASSANDRA_USERNAME,
};
use crate::storage::StorageError;

// =============================================================================
// Errors
// =============================================================================

/// A backend could not be constructed from configuration. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required key is absent.
    #[error("missing configuration value: {name}")]
    MissingVar {
        /// Key name
        name: &'static str,
    },

    /// A key is present but unusable.
    #[error("invalid configuration value for {name}: {value:?} ({reason})")]
    InvalidVar {
        /// Key name
        name: &'static str,
        /// Raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration selects a backend this build does not include.
    #[error("{backend} backend selected but not compiled in (enable the `{backend}` feature)")]
    BackendUnavailable {
        /// Backend name
        backend: &'static str,
    },

    /// The initial connection failed after the retry policy ran out.
    #[error("failed to connect to storage backend")]
    Connect(#[source] StorageError),
}

// =============================================================================
// Cassandra
// =============================================================================

/// Connection settings for the Cassandra backend.
#[derive(Clone, PartialEq, Eq)]
pub struct CassandraConfig {
    /// Contact point, `host:port`
    pub hostname: String,
    /// Username for password authentication
    pub username: String,
    /// Password for password authentication
    pub password: String,
    /// Keyspace holding the resources table
    pub keyspace: String,
    /// Timeout of a single connection attempt
    pub connect_timeout: Duration,
    /// Retries after the first failed connection attempt
    pub reconnect_max_retries: u32,
    /// Fixed pause between connection attempts
    pub reconnect_interval: Duration,
    /// Timeout of a single request
    pub request_timeout: Duration,
}

impl CassandraConfig {
    /// Settings with the default connection policy.
    #[must_use]
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        keyspace: impl Into<String>,
    ) -> Self {
        Self {
            hostname: with_default_port(hostname.into()),
            username: username.into(),
            password: password.into(),
            keyspace: keyspace.into(),
            connect_timeout: CASSANDRA_CONNECT_TIMEOUT_DEFAULT,
            reconnect_max_retries: CASSANDRA_RECONNECT_MAX_RETRIES_DEFAULT,
            reconnect_interval: CASSANDRA_RECONNECT_INTERVAL_DEFAULT,
            request_timeout: CASSANDRA_REQUEST_TIMEOUT_DEFAULT,
        }
    }
}

impl fmt::Debug for CassandraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CassandraConfig")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("keyspace", &self.keyspace)
            .field("connect_timeout", &self.connect_timeout)
            .field("reconnect_max_retries", &self.reconnect_max_retries)
            .field("reconnect_interval", &self.reconnect_interval)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn with_default_port(hostname: String) -> String {
    if hostname.contains(':') {
        hostname
    } else {
        format!("{hostname}:{CASSANDRA_PORT_DEFAULT}")
    }
}

// =============================================================================
// Backend selection
// =============================================================================

/// Which storage backend to construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Process-lifetime map
    Memory,
    /// Distributed wide-column store
    Cassandra(CassandraConfig),
}

impl BackendConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns error if the keyspace is set but other settings are missing
    /// or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns error if the keyspace is set but other settings are missing
    /// or malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(keyspace) = lookup(ENV_CASSANDRA_KEYSPACE) else {
            return Ok(Self::Memory);
        };
        if keyspace.trim().is_empty() {
            return Err(ConfigError::InvalidVar {
                name: ENV_CASSANDRA_KEYSPACE,
                value: keyspace,
                reason: "keyspace cannot be empty".to_string(),
            });
        }

        let required = |name: &'static str| lookup(name).ok_or(ConfigError::MissingVar { name });
        let hostname = required(ENV_CASSANDRA_HOSTNAME)?;
        let username = required(ENV_CASSANDRA_USERNAME)?;
        let password = required(ENV_CASSANDRA_PASSWORD)?;

        let mut config = CassandraConfig::new(hostname, username, password, keyspace);

        if let Some(secs) = parse_u64(&lookup, ENV_CASSANDRA_CONNECT_TIMEOUT_SECS)? {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_u64(&lookup, ENV_CASSANDRA_RECONNECT_INTERVAL_SECS)? {
            config.reconnect_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_u64(&lookup, ENV_CASSANDRA_REQUEST_TIMEOUT_SECS)? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_u64(&lookup, ENV_CASSANDRA_RECONNECT_MAX_RETRIES)? {
            config.reconnect_max_retries = u32::try_from(retries)
                .ok()
                .filter(|r| *r <= CASSANDRA_RECONNECT_MAX_RETRIES_MAX)
                .ok_or_else(|| ConfigError::InvalidVar {
                    name: ENV_CASSANDRA_RECONNECT_MAX_RETRIES,
                    value: retries.to_string(),
                    reason: format!("must be at most {CASSANDRA_RECONNECT_MAX_RETRIES_MAX}"),
                })?;
        }

        Ok(Self::Cassandra(config))
    }

    /// Short backend name for logs.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Cassandra(_) => "cassandra",
        }
    }
}

fn parse_u64<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| {
            value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidVar {
                name,
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const FULL: &[(&str, &str)] = &[
        ("CASSANDRA_KEYSPACE", "library"),
        ("CASSANDRA_HOSTNAME", "cassandra.local"),
        ("CASSANDRA_USERNAME", "folio"),
        ("CASSANDRA_PASSWORD", "secret"),
    ];

    #[test]
    fn test_no_keyspace_selects_memory() {
        let config = BackendConfig::from_lookup(lookup(&[("CASSANDRA_HOSTNAME", "ignored")])).unwrap();
        assert_eq!(config, BackendConfig::Memory);
    }

    #[test]
    fn test_keyspace_selects_cassandra() {
        let config = BackendConfig::from_lookup(lookup(FULL)).unwrap();

        let BackendConfig::Cassandra(c) = config else {
            panic!("expected cassandra config");
        };
        assert_eq!(c.keyspace, "library");
        assert_eq!(c.hostname, "cassandra.local:9042");
        assert_eq!(c.reconnect_max_retries, CASSANDRA_RECONNECT_MAX_RETRIES_DEFAULT);
        assert_eq!(c.reconnect_interval, CASSANDRA_RECONNECT_INTERVAL_DEFAULT);
    }

    #[test]
    fn test_missing_credentials() {
        let result = BackendConfig::from_lookup(lookup(&FULL[..3]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingVar { name: "CASSANDRA_PASSWORD" })
        ));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = FULL.to_vec();
        pairs.push(("CASSANDRA_HOSTNAME", "10.0.0.5:19042"));
        pairs.push(("CASSANDRA_RECONNECT_MAX_RETRIES", "3"));
        pairs.push(("CASSANDRA_RECONNECT_INTERVAL_SECS", "1"));

        let BackendConfig::Cassandra(c) = BackendConfig::from_lookup(lookup(&pairs)).unwrap() else {
            panic!("expected cassandra config");
        };
        assert_eq!(c.hostname, "10.0.0.5:19042");
        assert_eq!(c.reconnect_max_retries, 3);
        assert_eq!(c.reconnect_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_malformed_number() {
        let mut pairs = FULL.to_vec();
        pairs.push(("CASSANDRA_CONNECT_TIMEOUT_SECS", "soon"));

        let result = BackendConfig::from_lookup(lookup(&pairs));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidVar { name: "CASSANDRA_CONNECT_TIMEOUT_SECS", .. })
        ));
    }

    #[test]
    fn test_empty_keyspace_rejected() {
        let result = BackendConfig::from_lookup(lookup(&[("CASSANDRA_KEYSPACE", " ")]));
        assert!(matches!(result, Err(ConfigError::InvalidVar { .. })));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = CassandraConfig::new("h", "u", "hunter2", "k");
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_backend_name_per_variant() {
        assert_eq!(BackendConfig::Memory.backend_name(), "memory");

        let config = BackendConfig::from_lookup(lookup(FULL)).unwrap();
        assert_eq!(config.backend_name(), "cassandra");
    }
}
