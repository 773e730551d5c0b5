//! Backend Selector
//!
//! Turns a [`BackendConfig`] into a live backend, once, at startup. A
//! failing distributed backend is fatal: there is no fallback to memory.

use std::sync::Arc;

use super::backend::StorageBackend;
use super::memory::InMemoryBackend;
use crate::config::{BackendConfig, ConfigError};

/// Construct the configured storage backend.
///
/// # Errors
/// Returns [`ConfigError::Connect`] if the distributed store stays
/// unreachable after its retry policy, or
/// [`ConfigError::BackendUnavailable`] if it was not compiled in.
pub async fn open_backend(config: &BackendConfig) -> Result<Arc<dyn StorageBackend>, ConfigError> {
    match config {
        BackendConfig::Memory => {
            tracing::info!("Using in-memory storage; data will not survive a restart");
            Ok(Arc::new(InMemoryBackend::new()))
        }
        BackendConfig::Cassandra(cassandra) => open_cassandra(cassandra).await,
    }
}

#[cfg(feature = "cassandra")]
async fn open_cassandra(
    config: &crate::config::CassandraConfig,
) -> Result<Arc<dyn StorageBackend>, ConfigError> {
    tracing::info!(host = %config.hostname, keyspace = %config.keyspace, "Using Cassandra storage");
    let backend = super::cassandra::CassandraBackend::connect(config)
        .await
        .map_err(ConfigError::Connect)?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "cassandra"))]
#[allow(clippy::unused_async)]
async fn open_cassandra(
    _config: &crate::config::CassandraConfig,
) -> Result<Arc<dyn StorageBackend>, ConfigError> {
    Err(ConfigError::BackendUnavailable { backend: "cassandra" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CassandraConfig;

    #[tokio::test]
    async fn test_memory_selected() {
        let backend = open_backend(&BackendConfig::Memory).await.unwrap();
        assert_eq!(backend.name(), "memory");
    }

    #[cfg(not(feature = "cassandra"))]
    #[tokio::test]
    async fn test_cassandra_not_compiled_in() {
        let config = BackendConfig::Cassandra(CassandraConfig::new("h", "u", "p", "k"));

        let result = open_backend(&config).await;
        assert!(matches!(
            result,
            Err(ConfigError::BackendUnavailable { backend: "cassandra" })
        ));
    }

    #[cfg(feature = "cassandra")]
    #[tokio::test]
    async fn test_cassandra_unreachable_is_fatal() {
        let mut cassandra = CassandraConfig::new("127.0.0.1:1", "u", "p", "k");
        cassandra.reconnect_max_retries = 0;
        cassandra.connect_timeout = std::time::Duration::from_millis(200);

        let result = open_backend(&BackendConfig::Cassandra(cassandra)).await;
        assert!(matches!(result, Err(ConfigError::Connect(_))));
    }
}
