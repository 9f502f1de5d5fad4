//! Command handlers for the listing aggregation context.
//!
//! Each handler works on a copy of the current record, persists it, and only
//! then commits it to the session. A rejected write leaves the session's
//! identity and status exactly as they were.

use listing_core::clock::Clock;
use listing_core::config::AggregationConfig;
use listing_core::error::DomainError;
use listing_core::event::DomainEvent;
use listing_core::rng::DeterministicRng;
use listing_core::storage::{COMPLETED_LISTINGS_KEY, CURRENT_LISTING_KEY, KeyValueStore};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::application::query_handlers;
use crate::domain::aggregates::ListingRecord;
use crate::domain::commands::{CaptureSnapshot, CompleteListing, MarkDestination, RecordNavigation};
use crate::domain::events::ListingEvent;
use crate::domain::session::SessionState;

/// Prefix of every listing identifier.
pub const LISTING_ID_PREFIX: &str = "lst";

/// Number of random base-36 characters in a listing identifier.
pub const LISTING_ID_SUFFIX_LEN: usize = 8;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct ListingCommandResult {
    /// The listing affected or created by the command.
    pub listing_id: String,
    /// The record as persisted.
    pub record: ListingRecord,
    /// The events produced.
    pub events: Vec<ListingEvent>,
}

/// What a navigation did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Still in the creation flow, or no session was active.
    Unchanged,
    /// The session ended and its record was discarded.
    Reset {
        /// Identifier of the discarded record.
        listing_id: String,
    },
}

/// Builds a listing identifier from the current time and a random suffix:
/// `lst_<unix millis>_<8 base-36 chars>`.
#[must_use]
pub fn allocate_listing_id(clock: &dyn Clock, rng: &mut dyn DeterministicRng) -> String {
    let suffix: String = (0..LISTING_ID_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.next_u32_range(0, 35) as usize]))
        .collect();
    format!(
        "{LISTING_ID_PREFIX}_{}_{suffix}",
        clock.now().timestamp_millis()
    )
}

fn to_json(record: &ListingRecord) -> Result<Value, DomainError> {
    serde_json::to_value(record)
        .map_err(|e| DomainError::Persistence(format!("record serialization failed: {e}")))
}

async fn persist_current(store: &dyn KeyValueStore, record: &ListingRecord) -> Result<(), DomainError> {
    store.set(CURRENT_LISTING_KEY, to_json(record)?).await
}

fn commit(session: &mut SessionState, mut record: ListingRecord) -> ListingCommandResult {
    let events = record.take_uncommitted_events();
    for event in &events {
        debug!(
            event_type = event.event_type(),
            sequence_number = event.metadata().sequence_number,
            "recorded listing event"
        );
    }
    let listing_id = record.id.clone();
    session.commit(record.clone());
    ListingCommandResult {
        listing_id,
        record,
        events,
    }
}

/// Handles the `CaptureSnapshot` command: opens a record on the session's
/// first snapshot, otherwise replaces the current record's fields, then
/// persists the result.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the write is rejected; the session
/// is left untouched.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_capture_snapshot(
    command: &CaptureSnapshot,
    session: &mut SessionState,
    config: &AggregationConfig,
    clock: &dyn Clock,
    rng: &mut dyn DeterministicRng,
    store: &dyn KeyValueStore,
) -> Result<ListingCommandResult, DomainError> {
    let record = if let Some(current) = session.current() {
        let mut record = current.clone();
        record.merge_snapshot(command.snapshot.clone(), command.correlation_id, clock);
        debug!(listing_id = %record.id, version = record.version, "merged snapshot");
        record
    } else {
        let listing_id = allocate_listing_id(clock, rng);
        info!(%listing_id, "opening listing session");
        ListingRecord::open(
            listing_id,
            command.snapshot.clone(),
            &config.destinations,
            command.correlation_id,
            clock,
        )
    };

    persist_current(store, &record).await?;

    Ok(commit(session, record))
}

/// Handles the `RecordNavigation` command: leaving the creation flow ends the
/// session and clears the stored current record.
///
/// The stored record is cleared on every navigation away, with or without an
/// in-memory session, so a clear that failed earlier (or a record left by a
/// previous process) is retried.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty URL, or
/// `DomainError::Persistence` if the stored record cannot be cleared. The
/// in-memory session is reset regardless.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, url = %command.url))]
pub async fn handle_record_navigation(
    command: &RecordNavigation,
    session: &mut SessionState,
    config: &AggregationConfig,
    store: &dyn KeyValueStore,
) -> Result<NavigationOutcome, DomainError> {
    if command.url.trim().is_empty() {
        return Err(DomainError::Validation("navigation url must not be empty".into()));
    }
    if config.in_creation_flow(&command.url) {
        return Ok(NavigationOutcome::Unchanged);
    }

    let discarded = session.reset();
    if let Some(record) = &discarded {
        info!(listing_id = %record.id, "left creation flow, discarding listing");
    }
    store.set(CURRENT_LISTING_KEY, Value::Null).await?;

    Ok(discarded.map_or(NavigationOutcome::Unchanged, |record| {
        NavigationOutcome::Reset {
            listing_id: record.id,
        }
    }))
}

/// Handles the `MarkDestination` command.
///
/// # Errors
///
/// Returns `DomainError::ListingNotFound` with no active session,
/// `UnknownDestination` / `InvalidTransition` for a rejected move, or
/// `Persistence` if the write is rejected.
#[instrument(skip_all, fields(
    correlation_id = %command.correlation_id,
    destination = %command.destination,
    state = %command.state,
))]
pub async fn handle_mark_destination(
    command: &MarkDestination,
    session: &mut SessionState,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<ListingCommandResult, DomainError> {
    let mut record = session
        .current()
        .cloned()
        .ok_or(DomainError::ListingNotFound)?;

    let changed = record.mark_destination(
        &command.destination,
        command.state,
        command.correlation_id,
        clock,
    )?;
    if changed {
        persist_current(store, &record).await?;
        info!(listing_id = %record.id, "destination status updated");
    }

    Ok(commit(session, record))
}

/// Handles the `CompleteListing` command: appends the current record to the
/// completed listings and ends the session.
///
/// # Errors
///
/// Returns `DomainError::ListingNotFound` with no active session, or
/// `Persistence` if the completed list cannot be read or written. If only
/// clearing the stored current record fails, the session has already ended.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_complete_listing(
    command: &CompleteListing,
    session: &mut SessionState,
    store: &dyn KeyValueStore,
) -> Result<ListingRecord, DomainError> {
    let record = session
        .current()
        .cloned()
        .ok_or(DomainError::ListingNotFound)?;

    let mut completed = query_handlers::load_completed(store).await?;
    completed.push(record.clone());
    let value = serde_json::to_value(&completed)
        .map_err(|e| DomainError::Persistence(format!("listing serialization failed: {e}")))?;
    store.set(COMPLETED_LISTINGS_KEY, value).await?;

    session.reset();
    info!(listing_id = %record.id, total = completed.len(), "listing completed");
    store.set(CURRENT_LISTING_KEY, Value::Null).await?;

    Ok(record)
}
