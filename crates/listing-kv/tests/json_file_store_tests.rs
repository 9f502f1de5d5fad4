//! Integration tests for `JsonFileStore`.

use listing_core::error::DomainError;
use listing_core::storage::{COMPLETED_LISTINGS_KEY, CURRENT_LISTING_KEY, KeyValueStore};
use listing_kv::JsonFileStore;
use serde_json::json;

fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
    JsonFileStore::new(dir.path().join("store.json"))
}

// --- get ---

#[tokio::test]
async fn test_get_missing_file_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let value = store.get(CURRENT_LISTING_KEY).await.unwrap();

    assert!(value.is_none());
}

#[tokio::test]
async fn test_get_malformed_file_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "[1, 2, 3]").unwrap();

    let result = store.get(CURRENT_LISTING_KEY).await;

    assert!(matches!(result, Err(DomainError::Persistence(_))));
}

// --- set + get ---

#[tokio::test]
async fn test_set_then_get_returns_value() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let record = json!({"id": "lst_1", "fields": {"price": 10.0}});

    // Act
    store.set(CURRENT_LISTING_KEY, record.clone()).await.unwrap();
    let loaded = store.get(CURRENT_LISTING_KEY).await.unwrap();

    // Assert
    assert_eq!(loaded, Some(record));
}

#[tokio::test]
async fn test_set_keeps_other_keys() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store
        .set(COMPLETED_LISTINGS_KEY, json!([{"id": "lst_0"}]))
        .await
        .unwrap();

    // Act
    store.set(CURRENT_LISTING_KEY, json!({"id": "lst_1"})).await.unwrap();
    store.set(CURRENT_LISTING_KEY, json!(null)).await.unwrap();

    // Assert
    assert_eq!(
        store.get(COMPLETED_LISTINGS_KEY).await.unwrap(),
        Some(json!([{"id": "lst_0"}]))
    );
    assert_eq!(store.get(CURRENT_LISTING_KEY).await.unwrap(), Some(json!(null)));
}

#[tokio::test]
async fn test_values_survive_reopening() {
    let dir = tempfile::tempdir().unwrap();
    store_in(&dir)
        .set(CURRENT_LISTING_KEY, json!({"id": "lst_1"}))
        .await
        .unwrap();

    let reopened = store_in(&dir);

    assert_eq!(
        reopened.get(CURRENT_LISTING_KEY).await.unwrap(),
        Some(json!({"id": "lst_1"}))
    );
}

#[tokio::test]
async fn test_set_into_missing_directory_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("missing").join("store.json"));

    let result = store.set(CURRENT_LISTING_KEY, json!({})).await;

    assert!(matches!(result, Err(DomainError::Persistence(_))));
}
