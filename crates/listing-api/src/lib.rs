//! Listing API — HTTP front end for the listing aggregation store.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router over `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::messages::router())
        .merge(routes::navigation::router())
        .merge(routes::listings::router())
        .with_state(state)
}
