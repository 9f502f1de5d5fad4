//! Listing aggregation — one identified record per creation session.
//!
//! Turns the stream of `NEW_LISTING` snapshots into a single listing record
//! with a stable id and per-destination publish status, and discards that
//! identity when the user leaves the creation flow.

pub mod application;
pub mod domain;
mod store;

pub use store::AggregationStore;
