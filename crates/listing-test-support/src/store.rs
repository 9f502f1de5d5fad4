//! Test stores — `KeyValueStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use listing_core::error::DomainError;
use listing_core::storage::KeyValueStore;
use serde_json::Value;

/// An in-memory store that records every write.
///
/// Writes can be switched to fail with [`InMemoryStore::set_failing`] to
/// exercise the "write rejected, retry on next snapshot" path.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<String, Value>>,
    writes: Mutex<Vec<(String, Value)>>,
    failing: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value currently stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Returns every successful write, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<(String, Value)> {
        self.writes.lock().unwrap().clone()
    }

    /// Makes subsequent writes fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("quota exceeded".into()));
        }
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), value.clone()));
        self.values.lock().unwrap().insert(key.to_owned(), value);
        Ok(())
    }
}

/// A store whose reads and writes always fail. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, DomainError> {
        Err(DomainError::Persistence("storage unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), DomainError> {
        Err(DomainError::Persistence("storage unavailable".into()))
    }
}
