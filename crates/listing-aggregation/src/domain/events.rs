//! Domain events for the listing aggregation context.

use listing_core::event::{DomainEvent, EventMetadata};
use listing_core::listing::{ListingSnapshot, PublishState};
use serde::{Deserialize, Serialize};

/// Emitted when a new listing session receives its first snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingOpened {
    /// The newly allocated listing identifier.
    pub listing_id: String,
    /// Destinations initialized to `pending`.
    pub destinations: Vec<String>,
    /// The first snapshot.
    pub snapshot: ListingSnapshot,
}

/// Emitted when a later snapshot replaces the record's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMerged {
    /// The listing identifier.
    pub listing_id: String,
    /// The snapshot now held by the record.
    pub snapshot: ListingSnapshot,
}

/// Emitted when a destination's publish state moves forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationStatusChanged {
    /// The listing identifier.
    pub listing_id: String,
    /// The destination marketplace.
    pub destination: String,
    /// Previous state.
    pub from: PublishState,
    /// New state.
    pub to: PublishState,
}

/// Event type identifier for [`ListingOpened`].
pub const LISTING_OPENED_EVENT_TYPE: &str = "listing.opened";

/// Event type identifier for [`SnapshotMerged`].
pub const SNAPSHOT_MERGED_EVENT_TYPE: &str = "listing.snapshot_merged";

/// Event type identifier for [`DestinationStatusChanged`].
pub const DESTINATION_STATUS_CHANGED_EVENT_TYPE: &str = "listing.destination_status_changed";

/// Event payload variants for the listing aggregation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListingEventKind {
    /// A listing session has started.
    ListingOpened(ListingOpened),
    /// A snapshot replaced the record's fields.
    SnapshotMerged(SnapshotMerged),
    /// A destination status moved forward.
    DestinationStatusChanged(DestinationStatusChanged),
}

impl ListingEventKind {
    /// The event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ListingOpened(_) => LISTING_OPENED_EVENT_TYPE,
            Self::SnapshotMerged(_) => SNAPSHOT_MERGED_EVENT_TYPE,
            Self::DestinationStatusChanged(_) => DESTINATION_STATUS_CHANGED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the listing aggregation context.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ListingEventKind,
}

impl DomainEvent for ListingEvent {
    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
