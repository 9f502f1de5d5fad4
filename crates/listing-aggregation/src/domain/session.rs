//! The single-slot session state owned by the aggregation store.

use super::aggregates::ListingRecord;

/// Holds the current listing record, if a creation session is active.
///
/// Created empty; filled by the first snapshot; emptied when the user leaves
/// the creation flow or completes the listing.
#[derive(Debug, Default)]
pub struct SessionState {
    current: Option<ListingRecord>,
}

impl SessionState {
    /// Creates a state with no active session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current record, if any.
    #[must_use]
    pub fn current(&self) -> Option<&ListingRecord> {
        self.current.as_ref()
    }

    /// Identifier of the current record, if any.
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|r| r.id.as_str())
    }

    /// Installs `record` as the current record.
    pub fn commit(&mut self, record: ListingRecord) {
        self.current = Some(record);
    }

    /// Ends the session, returning the discarded record.
    pub fn reset(&mut self) -> Option<ListingRecord> {
        self.current.take()
    }
}
