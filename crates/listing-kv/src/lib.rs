//! Listing key-value storage.
//!
//! Durable implementations of the `KeyValueStore` trait defined in
//! `listing-core`.

pub mod json_file_store;

pub use json_file_store::JsonFileStore;
