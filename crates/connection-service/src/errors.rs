//! Connection Service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Messages
//! returned to clients are generic; the underlying error is logged
//! server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::access_token::AccessTokenError;
use serde::Serialize;
use thiserror::Error;

/// Connection Service error type.
///
/// Maps to HTTP status codes:
/// - Signing: 500 Internal Server Error
/// - BadRequest: 400 Bad Request
#[derive(Debug, Error)]
pub enum CsError {
    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl CsError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            CsError::Signing(_) => 500,
            CsError::BadRequest(_) => 400,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for CsError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            CsError::Signing(err) => {
                tracing::error!(target: "cs.signing", error = %err, "Token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SIGNING_ERROR",
                    "Failed to issue access token".to_string(),
                )
            }
            CsError::BadRequest(reason) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone()),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Convert token errors to CsError
impl From<AccessTokenError> for CsError {
    fn from(err: AccessTokenError) -> Self {
        CsError::Signing(err.to_string())
    }
}
