//! Health check handlers.
//!
//! - `/health`: Liveness probe - returns OK if the process is running
//! - `/ready`: Readiness probe - checks that signing keys are configured

use crate::models::ReadinessResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common::secret::ExposeSecret;
use std::sync::Arc;

/// Liveness probe handler.
///
/// Does not check any dependencies.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe handler.
///
/// Returns 200 when the API key and secret are non-empty, 503 otherwise.
/// Empty keys would make every token request fail at signing time.
#[tracing::instrument(skip_all, name = "cs.health.readiness")]
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let keys_configured = !state.config.api_key.is_empty()
        && !state.config.api_secret.expose_secret().is_empty();

    if !keys_configured {
        tracing::warn!(target: "cs.health", "Readiness check failed: signing keys not configured");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready".to_string(),
                signing_keys: "missing".to_string(),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ready".to_string(),
            signing_keys: "configured".to_string(),
        }),
    )
}
