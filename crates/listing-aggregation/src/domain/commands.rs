//! Commands for the listing aggregation context.

use listing_core::listing::{ListingSnapshot, PublishState};
use uuid::Uuid;

/// Command to fold a captured snapshot into the current listing.
#[derive(Debug, Clone)]
pub struct CaptureSnapshot {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The snapshot received from the capture engine.
    pub snapshot: ListingSnapshot,
}

/// Command reporting that the active tab's URL changed.
#[derive(Debug, Clone)]
pub struct RecordNavigation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The new URL.
    pub url: String,
}

/// Command to move one destination's publish state forward.
#[derive(Debug, Clone)]
pub struct MarkDestination {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The destination marketplace.
    pub destination: String,
    /// The requested state.
    pub state: PublishState,
}

/// Command to archive the current listing and end the session.
#[derive(Debug, Clone)]
pub struct CompleteListing {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}
