//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health, prometheus_metrics, trains, AppState};
use crate::trains::StatusSource;

/// Create the API router.
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: StatusSource + Send + Sync + 'static,
{
    Router::new()
        // Health endpoint
        .route("/health", get(health))
        // Train status
        .route("/trains", get(trains::<S>))
        .route("/metrics", get(prometheus_metrics::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
