use crate::core::Relay;
use crate::server::AppState;
use crate::utils::error::RelayError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

pub const ACK_STATUS: &str = "received and forwarded";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AckResponse {
    pub status: String,
}

impl AckResponse {
    pub fn forwarded() -> Self {
        Self {
            status: ACK_STATUS.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Accepts a webhook and forwards it to every destination.
///
/// The inbound `Content-Type` is not checked. Answers 400 when the body is
/// empty or not JSON; otherwise 200 once every delivery attempt finished,
/// whatever their outcomes.
#[instrument(name = "receive_webhook", skip(state, body), fields(content_length = body.len()))]
pub async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    let payload = match Relay::parse_payload(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Rejecting inbound webhook");
            return error_response(StatusCode::BAD_REQUEST, &e);
        }
    };

    match state.relay.fan_out(&payload).await {
        Ok(_report) => (StatusCode::OK, Json(AckResponse::forwarded())).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Fan-out could not start");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    }
}

fn error_response(status: StatusCode, error: &RelayError) -> Response {
    let body = ErrorResponse {
        error: ErrorDetail {
            code: error.code().to_string(),
            message: error.to_string(),
        },
    };
    (status, Json(body)).into_response()
}
