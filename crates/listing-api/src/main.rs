//! Listing API server entry point.

use std::sync::Arc;

use listing_aggregation::AggregationStore;
use listing_api::config::AppConfig;
use listing_api::error::AppError;
use listing_api::state::AppState;
use listing_core::clock::SystemClock;
use listing_core::rng::OsSeededRng;
use listing_kv::JsonFileStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting listing API server");

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;

    let kv = Arc::new(JsonFileStore::new(config.store_path.clone()));
    tracing::info!(path = %kv.path().display(), "using listing store");

    let store = AggregationStore::new(
        config.aggregation,
        Arc::new(SystemClock),
        Box::new(OsSeededRng::new()),
        kv,
    );

    // TODO: Restrict CORS to the capture extension's origin instead of permissive().
    let app = listing_api::app(AppState::new(store))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
