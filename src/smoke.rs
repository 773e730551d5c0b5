//! Smoke round against a live backend.
//!
//! create → get → update → stale update → list → delete → get, failing on
//! the first deviation. Leaves nothing behind on success.

use anyhow::{bail, ensure, Context};
use folio_core::{ResourceFields, ResourceStore, StoreError};

fn sample() -> ResourceFields {
    ResourceFields::new(
        format!("The Great Gatsby (smoke {})", run_suffix()),
        vec!["F. Scott Fitzgerald".to_string()],
        1925,
    )
    .with_comment("The story of the mysteriously wealthy Jay Gatsby and his love for Daisy Buchanan.")
}

/// Keeps repeated runs from tripping the duplicate check on leftovers.
fn run_suffix() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_default()
}

/// Run the round.
pub async fn run(store: &ResourceStore) -> anyhow::Result<()> {
    tracing::info!(backend = store.backend_name(), "Starting smoke round");

    let fields = sample();
    let created = store.create(fields.clone()).await.context("create")?;
    tracing::info!(id = %created.id, "Created resource");

    match store.create(fields.clone()).await {
        Err(StoreError::AlreadyExists { id }) if id == created.id => {}
        other => bail!("duplicate create was not rejected: {other:?}"),
    }

    let fetched = store.get(&created.id).await.context("get")?;
    ensure!(fetched.title == created.title, "fetched title differs from created");

    let mut changed = fetched.fields();
    changed.year = 1945;
    let updated = store
        .update(&created.id, &fetched.version, changed.clone())
        .await
        .context("update")?;
    ensure!(updated.year == 1945, "update did not apply");
    ensure!(updated.version != fetched.version, "update did not change version");

    match store.update(&created.id, &fetched.version, changed).await {
        Err(StoreError::VersionMismatch { .. }) => {}
        other => bail!("stale update was not rejected: {other:?}"),
    }

    let listed = store.list().await.context("list")?;
    ensure!(listed.iter().any(|r| r.id == created.id), "resource missing from list");

    store.delete(&created.id, &updated.version).await.context("delete")?;
    match store.get(&created.id).await {
        Err(StoreError::NotFound { .. }) => {}
        other => bail!("resource still readable after delete: {other:?}"),
    }

    tracing::info!("Smoke round passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::InMemoryBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_smoke_round_in_memory() {
        let store = ResourceStore::new(Arc::new(InMemoryBackend::new()));
        run(&store).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
