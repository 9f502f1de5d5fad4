//! Domain event envelope shared by the aggregation store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every listing event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Dotted event name, e.g. `listing.opened`.
    pub event_type: String,
    /// Listing the event belongs to.
    pub listing_id: String,
    /// Position of the event within the listing session, starting at 1.
    pub sequence_number: i64,
    /// Correlation ID of the command that produced the event.
    pub correlation_id: Uuid,
    /// When the change happened.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Builds metadata with a fresh event id.
    #[must_use]
    pub fn new(
        event_type: &str,
        listing_id: &str,
        sequence_number: i64,
        correlation_id: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            listing_id: listing_id.to_owned(),
            sequence_number,
            correlation_id,
            occurred_at,
        }
    }
}

/// A recorded change to a listing.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// The event's metadata.
    fn metadata(&self) -> &EventMetadata;

    /// The event payload as JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// The dotted event name.
    fn event_type(&self) -> &str {
        &self.metadata().event_type
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_new_metadata_gets_distinct_event_ids() {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let correlation_id = Uuid::new_v4();

        let a = EventMetadata::new("listing.opened", "lst_1", 1, correlation_id, at);
        let b = EventMetadata::new("listing.opened", "lst_1", 1, correlation_id, at);

        assert_ne!(a.event_id, b.event_id);
        assert_eq!(a.listing_id, "lst_1");
        assert_eq!(a.occurred_at, at);
    }
}
