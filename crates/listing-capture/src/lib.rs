//! Listing capture — change detection and field extraction.
//!
//! Watches a listing form through a stream of [`page::PageEvent`]s, throttles
//! re-extraction, and sends each extracted snapshot to the aggregation store
//! as a `NEW_LISTING` message.

pub mod engine;
pub mod extract;
pub mod page;
pub mod selectors;
pub mod throttle;

pub use engine::CaptureEngine;
pub use page::{InputEvent, InputKind, MutationKind, MutationRecord, Page, PageEvent, StaticPage};
