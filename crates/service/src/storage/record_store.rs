use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use tokio::{fs, sync::RwLock};

use models::HealthRecord;

use crate::errors::ServiceError;

/// Ordered, JSON file-backed map from record id to record.
///
/// Backed by a `BTreeMap`, so `values` iterates in ascending key order.
/// Every write persists the whole map; absence is always represented with
/// `Option`, never signaled as an error.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<RwLock<BTreeMap<String, HealthRecord>>>,
    file_path: Option<PathBuf>,
}

impl RecordStore {
    /// Open the durable store at a path. Creates the file with an empty map
    /// if missing; an unreadable file starts the store empty.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: BTreeMap<String, HealthRecord> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: BTreeMap<String, HealthRecord> = BTreeMap::new();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?,
                )
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self {
            inner: Arc::new(RwLock::new(map)),
            file_path: Some(file_path),
        }))
    }

    /// Volatile store with the same contract, for tests.
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self {
            inner: Arc::new(RwLock::new(BTreeMap::new())),
            file_path: None,
        })
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let map = self.inner.read().await;
        let data = serde_json::to_vec(&*map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(path, data)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Get record by id.
    pub async fn get(&self, id: &str) -> Option<HealthRecord> {
        let map = self.inner.read().await;
        map.get(id).cloned()
    }

    /// Unconditional write at the key; returns whatever was stored there
    /// before. Used both for first-time creation and full-replace updates.
    pub async fn insert(
        &self,
        id: String,
        record: HealthRecord,
    ) -> Result<Option<HealthRecord>, ServiceError> {
        let mut map = self.inner.write().await;
        let previous = map.insert(id, record);
        drop(map);
        self.save().await?;
        Ok(previous)
    }

    /// Remove a key and persist. The returned record is the caller's only
    /// signal that anything was deleted.
    pub async fn remove(&self, id: &str) -> Result<Option<HealthRecord>, ServiceError> {
        let mut map = self.inner.write().await;
        let removed = map.remove(id);
        drop(map);
        self.save().await?;
        Ok(removed)
    }

    /// Snapshot of all records in ascending key order.
    pub async fn values(&self) -> Vec<HealthRecord> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }
}
