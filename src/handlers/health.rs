//! Liveness endpoints

use axum::{extract::State, Json};

use crate::state::AppState;

pub async fn root() -> &'static str {
    "Graso API Server"
}

/// Health check response
#[derive(serde::Serialize)]
pub struct HealthResponse {
    status: String,
    database: String,
    version: String,
}

/// GET /health - reports whether the store answers
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match state.store.ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if db_status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        database: db_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
