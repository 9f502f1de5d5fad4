//! Query handlers for the listing aggregation context.
//!
//! Queries never touch the session; they return read-only view DTOs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use listing_core::error::DomainError;
use listing_core::listing::{ListingSnapshot, PublishState};
use listing_core::storage::{COMPLETED_LISTINGS_KEY, KeyValueStore};
use serde::Serialize;

use crate::domain::aggregates::ListingRecord;
use crate::domain::session::SessionState;

/// Read-only view of a listing record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    /// The listing identifier.
    pub id: String,
    /// The most recent snapshot.
    pub fields: ListingSnapshot,
    /// Time of the first snapshot.
    pub captured_at: DateTime<Utc>,
    /// Time of the latest change.
    pub last_updated: DateTime<Utc>,
    /// Publish state per destination.
    pub status: BTreeMap<String, PublishState>,
    /// Current version (event count).
    pub version: i64,
}

impl From<&ListingRecord> for ListingView {
    fn from(record: &ListingRecord) -> Self {
        Self {
            id: record.id.clone(),
            fields: record.fields.clone(),
            captured_at: record.captured_at,
            last_updated: record.last_updated,
            status: record.status.clone(),
            version: record.version,
        }
    }
}

/// Returns the listing being composed in the current session.
///
/// # Errors
///
/// Returns `DomainError::ListingNotFound` if no session is active.
pub fn get_current_listing(session: &SessionState) -> Result<ListingView, DomainError> {
    session
        .current()
        .map(ListingView::from)
        .ok_or(DomainError::ListingNotFound)
}

/// Lists every completed listing, oldest first.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the store cannot be read or the
/// stored list is malformed.
pub async fn list_completed_listings(
    store: &dyn KeyValueStore,
) -> Result<Vec<ListingView>, DomainError> {
    let records = load_completed(store).await?;
    Ok(records.iter().map(ListingView::from).collect())
}

pub(crate) async fn load_completed(
    store: &dyn KeyValueStore,
) -> Result<Vec<ListingRecord>, DomainError> {
    match store.get(COMPLETED_LISTINGS_KEY).await? {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| DomainError::Persistence(format!("malformed completed listings: {e}"))),
    }
}
