use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::AppState;

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Ready only while the document store answers; a failing store reports 503
/// so the instance is taken out of rotation instead of accepting submissions
/// it cannot persist.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.submissions.documents().check_health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "database": "connected"
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "database": "disconnected"
                })),
            )
        }
    }
}
