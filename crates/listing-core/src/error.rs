//! Domain error types.

use thiserror::Error;

use crate::listing::PublishState;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No listing is currently being composed.
    #[error("no current listing")]
    ListingNotFound,

    /// A destination status change that would move backwards or sideways.
    #[error("invalid status transition for {destination}: {from} -> {to}")]
    InvalidTransition {
        /// The destination whose status was being changed.
        destination: String,
        /// The state currently recorded.
        from: PublishState,
        /// The requested state.
        to: PublishState,
    },

    /// The destination is not tracked on the current listing.
    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    /// A page read failed while extracting a snapshot.
    #[error("extraction failure: {0}")]
    Extraction(String),

    /// The storage substrate rejected a read or write.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid configuration (bad selector, malformed value).
    #[error("configuration error: {0}")]
    Configuration(String),
}
