//! Error types for the HTTP API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Internal
//! details are logged, never sent to the client.

use awf_lobby::LobbyError;
use awf_store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The session or player does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request body or parameters are invalid.
    #[error("{0}")]
    InvalidInput(String),

    /// The session has already started.
    #[error("session already started")]
    AlreadyStarted,

    /// The session has not started yet, so it has no shared collection.
    #[error("session not started")]
    NotStarted,

    /// The player already has a live connection.
    #[error("player already registered")]
    AlreadyRegistered,

    /// Storage or registry failure unrelated to the request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::AlreadyStarted | Self::NotStarted | Self::AlreadyRegistered => {
                StatusCode::CONFLICT
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to clients.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => String::from("internal error"),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::SessionNotFound(_) => Self::NotFound(String::from("session not found")),
            StoreError::PlayerNotFound(_) => Self::NotFound(String::from("player not found")),
            StoreError::AlreadyStarted(_) => Self::AlreadyStarted,
            StoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<LobbyError> for ApiError {
    fn from(error: LobbyError) -> Self {
        match error {
            LobbyError::SessionNotFound => Self::NotFound(String::from("session not found")),
            LobbyError::PlayerAlreadyRegistered => Self::AlreadyRegistered,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(detail) = &self {
            tracing::error!(%detail, "request failed");
        }

        let body = serde_json::json!({
            "error": self.public_message(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
