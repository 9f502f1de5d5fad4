//! Aggregate root for the listing aggregation context.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use listing_core::clock::Clock;
use listing_core::error::DomainError;
use listing_core::event::EventMetadata;
use listing_core::listing::{ListingSnapshot, PublishState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::{
    DestinationStatusChanged, ListingEvent, ListingEventKind, ListingOpened, SnapshotMerged,
};

/// The listing being composed in the current creation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// Listing identifier, fixed for the whole session.
    pub id: String,
    /// Most recent snapshot.
    pub fields: ListingSnapshot,
    /// Time of the latest merge.
    pub last_updated: DateTime<Utc>,
    /// Time of the first snapshot.
    pub captured_at: DateTime<Utc>,
    /// Publish state per destination.
    pub status: BTreeMap<String, PublishState>,
    /// Current version (event count).
    pub version: i64,
    /// Uncommitted events pending persistence.
    #[serde(skip)]
    uncommitted_events: Vec<ListingEvent>,
}

impl ListingRecord {
    /// Opens a record from the session's first snapshot, with every
    /// destination `pending`.
    #[must_use]
    pub fn open(
        id: String,
        snapshot: ListingSnapshot,
        destinations: &[String],
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        let status = destinations
            .iter()
            .map(|d| (d.clone(), PublishState::Pending))
            .collect();
        let mut record = Self {
            id: id.clone(),
            fields: snapshot.clone(),
            last_updated: now,
            captured_at: now,
            status,
            version: 0,
            uncommitted_events: Vec::new(),
        };
        record.record_event(
            ListingEventKind::ListingOpened(ListingOpened {
                listing_id: id,
                destinations: destinations.to_vec(),
                snapshot,
            }),
            correlation_id,
            now,
        );
        record
    }

    /// Replaces the record's fields with `snapshot`.
    ///
    /// Last write wins: each snapshot is the full form state, so no
    /// field-level merge happens. `id`, `status` and `captured_at` are kept.
    pub fn merge_snapshot(
        &mut self,
        snapshot: ListingSnapshot,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        let now = clock.now();
        self.fields = snapshot.clone();
        self.last_updated = now;
        self.record_event(
            ListingEventKind::SnapshotMerged(SnapshotMerged {
                listing_id: self.id.clone(),
                snapshot,
            }),
            correlation_id,
            now,
        );
    }

    /// Moves `destination` to `state`.
    ///
    /// Returns `false` when the destination is already in `state`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownDestination` if the destination is not
    /// tracked, or `DomainError::InvalidTransition` if the move is not
    /// `pending → posted` or `pending → failed`.
    pub fn mark_destination(
        &mut self,
        destination: &str,
        state: PublishState,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<bool, DomainError> {
        let current = *self
            .status
            .get(destination)
            .ok_or_else(|| DomainError::UnknownDestination(destination.to_owned()))?;
        if !current.can_transition_to(state) {
            return Err(DomainError::InvalidTransition {
                destination: destination.to_owned(),
                from: current,
                to: state,
            });
        }
        if current == state {
            return Ok(false);
        }

        let now = clock.now();
        self.status.insert(destination.to_owned(), state);
        self.last_updated = now;
        self.record_event(
            ListingEventKind::DestinationStatusChanged(DestinationStatusChanged {
                listing_id: self.id.clone(),
                destination: destination.to_owned(),
                from: current,
                to: state,
            }),
            correlation_id,
            now,
        );
        Ok(true)
    }

    fn record_event(&mut self, kind: ListingEventKind, correlation_id: Uuid, now: DateTime<Utc>) {
        self.version += 1;
        let metadata =
            EventMetadata::new(kind.event_type(), &self.id, self.version, correlation_id, now);
        self.uncommitted_events.push(ListingEvent { metadata, kind });
    }

    /// Events recorded since the last [`Self::take_uncommitted_events`].
    #[must_use]
    pub fn uncommitted_events(&self) -> &[ListingEvent] {
        &self.uncommitted_events
    }

    /// Drains the recorded events once the record has been persisted.
    pub fn take_uncommitted_events(&mut self) -> Vec<ListingEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }
}
