use std::sync::Arc;

use axum::{extract::State, routing, Json, Router};
use chrono::{DateTime, Utc};
use portfolio_core_health_contracts::{HealthFeatureService, HealthStatus};
use serde::Serialize;

pub fn router(service: Arc<impl HealthFeatureService>) -> Router<()> {
    Router::new()
        .route("/health", routing::get(health))
        .with_state(service)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp: DateTime<Utc>,
    email: bool,
}

/// Liveness check. Always succeeds while the process serves requests, the
/// state of the email transport is reported but does not change the status.
async fn health(service: State<Arc<impl HealthFeatureService>>) -> Json<HealthResponse> {
    let HealthStatus { email, timestamp } = service.get_status().await;

    Json(HealthResponse {
        status: "OK",
        message: "Portfolio API is running",
        timestamp,
        email,
    })
}
