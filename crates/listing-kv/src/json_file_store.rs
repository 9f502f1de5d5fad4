//! A `KeyValueStore` kept as a single JSON object on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use listing_core::error::DomainError;
use listing_core::storage::KeyValueStore;

/// File-backed key-value store.
///
/// The whole store is one JSON object. Each write rewrites the file through
/// a sibling temporary file and a rename, so readers never see a partial
/// document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Map<String, Value>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(DomainError::Persistence(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };
        if bytes.is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_slice(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(DomainError::Persistence(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(DomainError::Persistence(format!(
                "failed to parse {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn save(&self, map: &Map<String, Value>) -> Result<(), DomainError> {
        let bytes = serde_json::to_vec_pretty(map)
            .map_err(|e| DomainError::Persistence(format!("failed to encode store: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await.map_err(|e| {
            DomainError::Persistence(format!("failed to write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            DomainError::Persistence(format!(
                "failed to replace {}: {e}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        Ok(map.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    async fn set(&self, key: &str, value: Value) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        map.insert(key.to_owned(), value);
        self.save(&map).await?;
        debug!(keys = map.len(), "store written");
        Ok(())
    }
}
