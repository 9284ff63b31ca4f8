//! Liveness endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Reports process and database health.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_up = state.db.health_check().await;

    Json(HealthResponse {
        status: if db_up { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if db_up { "up" } else { "down" },
        timestamp: Utc::now().to_rfc3339(),
    })
}
