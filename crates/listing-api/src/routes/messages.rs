//! The capture → aggregation message endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use listing_core::message::{Ack, ListingMessage};
use tracing::{debug, instrument};

use crate::state::AppState;

/// POST /api/v1/messages
///
/// Accepts `{ "type": "NEW_LISTING", "data": { ... } }` and always
/// acknowledges; a snapshot that fails to persist is logged, not reported.
#[instrument(skip_all, fields(message_type = message.message_type()))]
async fn receive_message(
    State(state): State<AppState>,
    Json(message): Json<ListingMessage>,
) -> Json<Ack> {
    debug!("received listing message");
    let mut store = state.store.lock().await;
    Json(store.on_message(message).await)
}

/// Returns the router for the message endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/messages", post(receive_message))
}
