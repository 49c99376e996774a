//! Health endpoints
//!
//! `/health` and `/health/live` answer as long as the process runs;
//! `/health/ready` additionally probes the database and answers 503
//! while it is unreachable.

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Error detail when the database probe failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
        database: None,
    })
}

/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match db::health_check(state.db()).await {
        Ok(()) => Ok(Json(HealthResponse {
            status: "ready",
            version: VERSION,
            database: None,
        })),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "not_ready",
                version: VERSION,
                database: Some(e.to_string()),
            }),
        )),
    }
}

/// GET /health/live
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive",
        version: VERSION,
        database: None,
    })
}
