//! Application layer: command and query handlers over the session state.

pub mod command_handlers;
pub mod query_handlers;
