//! Connection details handler.
//!
//! `GET /api/connection-details?room=&identity=` returns everything a client
//! needs to join a media room: the server URL, the API key, and a freshly
//! signed participant token scoped to the requested room.

use crate::errors::CsError;
use crate::models::{ConnectionDetails, ConnectionDetailsParams};
use crate::observability::metrics::{record_error, record_token_issued};
use crate::routes::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use common::access_token::VideoGrant;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Handler for GET /api/connection-details
///
/// Absent `room` defaults to `dev`, absent `identity` to `guest`. A repeated
/// key uses its first value. The grant
/// allows joining exactly the requested room. Signing failures are returned
/// as 500 and never as a success body.
#[instrument(
    skip_all,
    name = "cs.connection_details.issue",
    fields(room = tracing::field::Empty, status = tracing::field::Empty)
)]
pub async fn get_connection_details(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ConnectionDetails>, CsError> {
    let Query(pairs) = query.map_err(|e| {
        tracing::debug!(target: "cs.handlers.connection_details", error = %e, "Rejected query string");
        record_error("connection_details", "bad_request", 400);
        CsError::BadRequest("Invalid query string".to_string())
    })?;

    let (room, identity) = ConnectionDetailsParams::from_pairs(pairs).into_parts();
    tracing::Span::current().record("room", room.as_str());

    let grant = VideoGrant::room_join(&room);

    let start = Instant::now();
    let result = state.signer.sign(&identity, &grant).await;
    let duration = start.elapsed();

    let participant_token = match result {
        Ok(token) => {
            record_token_issued("success", duration);
            tracing::Span::current().record("status", "success");
            token
        }
        Err(e) => {
            record_token_issued("error", duration);
            record_error("connection_details", "signing", e.status_code());
            tracing::Span::current().record("status", "error");
            tracing::warn!(target: "cs.handlers.connection_details", "Failed to sign participant token");
            return Err(e);
        }
    };

    tracing::debug!(target: "cs.handlers.connection_details", "Issued participant token");

    Ok(Json(ConnectionDetails {
        server_url: state.config.server_url.clone(),
        api_key: state.config.api_key.clone(),
        participant_token,
    }))
}
