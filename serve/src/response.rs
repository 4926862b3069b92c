//! JSON response bodies and the error type every handler returns.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docchat::ChatError;
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct MessageResponse {
    pub(crate) message: String,
}

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

/// Handler error, rendered as `{"error": "..."}` with the matching status.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// Input validation failure (400).
    BadRequest(String),
    /// Document could not be read (422).
    Unprocessable(String),
    /// Generation capability failed (502).
    BadGateway(String),
    /// Generation capability timed out (504).
    GatewayTimeout(String),
    /// Status chosen by a lower layer (e.g. 413 from the body limit).
    Status(StatusCode, String),
    /// Server-side failure (500).
    Internal(String),
}

impl ApiError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            Self::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
            Self::BadGateway(m) => (StatusCode::BAD_GATEWAY, m),
            Self::GatewayTimeout(m) => (StatusCode::GATEWAY_TIMEOUT, m),
            Self::Status(s, m) => (s, m),
            Self::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Generation(_) => Self::BadGateway(e.to_string()),
            ChatError::Timeout(_) => Self::GatewayTimeout(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        if status.is_server_error() {
            tracing::warn!(status = %status, "{}", error);
        } else {
            tracing::debug!(status = %status, "{}", error);
        }
        (status, Json(ErrorBody { error })).into_response()
    }
}
