//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::error;

use crate::trains::report::{CONTENT_TYPE, REPLY_HEADER, REPLY_HEADER_VALUE};
use crate::trains::{StatusSource, TrainChecker, TrainStatusReport};

/// Application state shared with handlers.
pub struct AppState<S> {
    /// Checker for the configured trains.
    pub checker: Arc<TrainChecker<S>>,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl<S> AppState<S> {
    /// Create new app state.
    pub fn new(checker: TrainChecker<S>) -> Self {
        Self {
            checker: Arc::new(checker),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            checker: Arc::clone(&self.checker),
            metrics: self.metrics.clone(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Train status handler - checks every configured train.
pub async fn trains<S>(State(state): State<AppState<S>>) -> Response
where
    S: StatusSource + Send + Sync + 'static,
{
    let report = state.checker.run().await;
    report_response(&report)
}

/// Prometheus metrics handler - 404 when no recorder is installed.
pub async fn prometheus_metrics<S>(State(state): State<AppState<S>>) -> Response
where
    S: Send + Sync + 'static,
{
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Build the HTTP reply for a report: 200 with the JSON body, or 500 when
/// the report cannot be serialized.
pub fn report_response(report: &TrainStatusReport) -> Response {
    match report.to_json() {
        Ok(body) => (
            StatusCode::OK,
            [
                ("content-type", CONTENT_TYPE),
                (REPLY_HEADER, REPLY_HEADER_VALUE),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to serialize train status report");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
