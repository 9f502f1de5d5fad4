//! Routes for reading and finishing listings.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use listing_aggregation::application::query_handlers::ListingView;
use listing_core::listing::PublishState;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/v1/listings/current/status.
#[derive(Debug, Deserialize)]
pub struct MarkDestinationRequest {
    /// The destination marketplace.
    pub destination: String,
    /// The new state: `pending`, `posted` or `failed`.
    pub state: PublishState,
}

/// GET /api/v1/listings/current
async fn get_current_listing(State(state): State<AppState>) -> Result<Json<ListingView>, ApiError> {
    let store = state.store.lock().await;
    Ok(Json(store.current_listing()?))
}

/// POST /api/v1/listings/current/status
#[instrument(skip(state, request), fields(destination = %request.destination, state = %request.state))]
async fn mark_destination(
    State(state): State<AppState>,
    Json(request): Json<MarkDestinationRequest>,
) -> Result<Json<ListingView>, ApiError> {
    let mut store = state.store.lock().await;
    let view = store
        .mark_destination(&request.destination, request.state)
        .await?;
    info!(listing_id = %view.id, "destination marked");
    Ok(Json(view))
}

/// POST /api/v1/listings/current/complete
#[instrument(skip(state))]
async fn complete_listing(State(state): State<AppState>) -> Result<Json<ListingView>, ApiError> {
    let mut store = state.store.lock().await;
    let view = store.complete_listing().await?;
    info!(listing_id = %view.id, "listing completed");
    Ok(Json(view))
}

/// GET /api/v1/listings
async fn list_completed(State(state): State<AppState>) -> Result<Json<Vec<ListingView>>, ApiError> {
    let store = state.store.lock().await;
    Ok(Json(store.completed_listings().await?))
}

/// Returns the router for listing reads and completion.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/listings", get(list_completed))
        .route("/api/v1/listings/current", get(get_current_listing))
        .route("/api/v1/listings/current/status", post(mark_destination))
        .route("/api/v1/listings/current/complete", post(complete_listing))
}
