//! Tab navigation reports.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use listing_aggregation::application::command_handlers::NavigationOutcome;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/v1/navigation.
#[derive(Debug, Deserialize)]
pub struct NavigationRequest {
    /// The active tab's new URL.
    pub url: String,
}

/// Response body for POST /api/v1/navigation.
#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    /// Whether the listing session was ended.
    pub reset: bool,
    /// Identifier of the discarded listing, if any.
    pub listing_id: Option<String>,
}

impl From<NavigationOutcome> for NavigationResponse {
    fn from(outcome: NavigationOutcome) -> Self {
        match outcome {
            NavigationOutcome::Unchanged => Self {
                reset: false,
                listing_id: None,
            },
            NavigationOutcome::Reset { listing_id } => Self {
                reset: true,
                listing_id: Some(listing_id),
            },
        }
    }
}

/// POST /api/v1/navigation
#[instrument(skip_all, fields(url = %request.url))]
async fn record_navigation(
    State(state): State<AppState>,
    Json(request): Json<NavigationRequest>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let mut store = state.store.lock().await;
    let outcome = store.on_navigation(&request.url).await?;
    Ok(Json(outcome.into()))
}

/// Returns the router for navigation reports.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/navigation", post(record_navigation))
}
