use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use bus_tracker::{FeatureCollection, Reply, TrackerConfig, VehiclesRequest};
use realtime::HttpError;
use tracing::error;

use crate::provider::Provider;

const SERVICE: &str = "buses";

pub fn router(config: TrackerConfig) -> Router {
    Router::new()
        .route("/api/buses", get(buses))
        .route("/health", get(health))
        .with_state(Arc::new(config))
}

#[axum::debug_handler]
async fn buses(
    State(config): State<Arc<TrackerConfig>>, headers: HeaderMap,
) -> Result<Reply<FeatureCollection>, HttpError> {
    let provider = Provider::new()?;
    vehicles(&config, headers, &provider).await
}

// Aggregate and map failures to their HTTP status.
async fn vehicles(
    config: &TrackerConfig, headers: HeaderMap, provider: &impl bus_tracker::Provider,
) -> Result<Reply<FeatureCollection>, HttpError> {
    let request = VehiclesRequest { headers };

    bus_tracker::handle(request, config, provider).await.map_err(|e| {
        error!(monotonic_counter.processing_errors = 1, error = %e, service = %SERVICE);
        e.into()
    })
}

#[allow(clippy::unused_async)]
async fn health() -> &'static str {
    "OK"
}
