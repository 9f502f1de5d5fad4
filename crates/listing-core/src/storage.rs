//! Key-value storage abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// Storage key holding the accumulating list of completed listings.
pub const COMPLETED_LISTINGS_KEY: &str = "listings";

/// Storage key holding the single in-progress listing record.
pub const CURRENT_LISTING_KEY: &str = "currentListing";

/// Asynchronous string-keyed store of JSON values.
///
/// Each key is independently consistent; no cross-key transactions are
/// assumed.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), DomainError>;
}
