//! Listing Core — shared schema and abstractions.
//!
//! This crate defines the listing schema exchanged between the capture engine
//! and the aggregation store, along with the traits both sides are injected
//! with (clock, randomness, storage). It contains no infrastructure code.

pub mod automation;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod listing;
pub mod message;
pub mod rng;
pub mod storage;
