//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure the data directory exists before the store opens its file.
pub async fn ensure_env(data_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(data_dir).await.is_err() {
        warn!(%data_dir, "data directory not found; creating it");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_env_creates_missing_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("records-env-{}", std::process::id()));
        let _ = tokio::fs::remove_dir_all(&dir).await;

        let dir_str = dir.to_string_lossy().into_owned();
        ensure_env(&dir_str).await?;
        assert!(tokio::fs::metadata(&dir).await.is_ok());

        // Idempotent on an existing directory
        ensure_env(&dir_str).await?;

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
