//! Route modules.

pub mod health;
pub mod listings;
pub mod messages;
pub mod navigation;
