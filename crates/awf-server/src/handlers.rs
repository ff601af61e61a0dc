//! REST API endpoint handlers.
//!
//! Handlers translate requests into calls against the session store and
//! announce every committed change to the lobby.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness probe |
//! | `POST` | `/api/v1/sessions` | Create a session from [`Options`] |
//! | `GET` | `/api/v1/sessions/{session_id}` | Session snapshot |
//! | `POST` | `/api/v1/sessions/{session_id}/players` | Register a player |
//! | `GET` | `/api/v1/sessions/{session_id}/players/{player_id}/collection` | Shared collection |
//!
//! The player `WebSocket` lives in [`crate::ws`].

use std::sync::Arc;

use awf_core::{Collection, Options, PlayerId, PlayerRegistration, SessionId, SessionView};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/v1/sessions/{session_id}/players`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddPlayerRequest {
    /// Display name.
    #[validate(length(min = 1, message = "no player name provided"))]
    pub name: String,
    /// The player's complete card pool.
    #[validate(custom(function = "non_empty_collection"))]
    pub collection: Collection,
}

impl From<AddPlayerRequest> for PlayerRegistration {
    fn from(request: AddPlayerRequest) -> Self {
        Self {
            name: request.name,
            collection: request.collection,
        }
    }
}

fn non_empty_collection(collection: &Collection) -> Result<(), ValidationError> {
    if collection.is_empty() {
        return Err(ValidationError::new("empty_collection")
            .with_message("empty collection provided".into()));
    }
    Ok(())
}

/// Response body carrying a newly created identifier.
#[derive(Debug, Serialize)]
pub struct CreatedResponse<T> {
    /// The new identifier.
    pub id: T,
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub(crate) fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse()
        .map_err(|e| ApiError::InvalidInput(format!("invalid session id: {e}")))
}

pub(crate) fn parse_player_id(raw: &str) -> Result<PlayerId, ApiError> {
    raw.parse()
        .map_err(|e| ApiError::InvalidInput(format!("invalid player id: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Create a session and announce it to the lobby.
///
/// # Route
///
/// `POST /api/v1/sessions`
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Options>, JsonRejection>,
) -> Result<Json<CreatedResponse<SessionId>>, ApiError> {
    let Json(options) = payload.map_err(|e| {
        ApiError::InvalidInput(format!("no session creation option data provided: {e}"))
    })?;

    let session_id = state.store.create_session(options)?;
    state.lobby.new_session(session_id);

    Ok(Json(CreatedResponse { id: session_id }))
}

/// Fetch a session snapshot.
///
/// # Route
///
/// `GET /api/v1/sessions/{session_id}`
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    let session = state.store.get_session(session_id)?;
    Ok(Json(session.view()))
}

/// Register a player and broadcast the new player list.
///
/// # Route
///
/// `POST /api/v1/sessions/{session_id}/players`
pub async fn add_player(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    payload: Result<Json<AddPlayerRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse<PlayerId>>, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    let Json(request) = payload.map_err(|e| {
        ApiError::InvalidInput(format!("no player registration data provided: {e}"))
    })?;
    request
        .validate()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let (player_id, session) = state.store.add_player(session_id, request.into())?;
    let reached = state.broadcast(session_id, &session.view());
    info!(%session_id, %player_id, reached, "player registered");

    Ok(Json(CreatedResponse { id: player_id }))
}

/// Fetch a player's shared collection once the session has started.
///
/// # Route
///
/// `GET /api/v1/sessions/{session_id}/players/{player_id}/collection`
pub async fn get_session_collection(
    State(state): State<Arc<AppState>>,
    Path((session_id, player_id)): Path<(String, String)>,
) -> Result<Json<Collection>, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    let player_id = parse_player_id(&player_id)?;

    let session = state.store.get_session(session_id)?;
    if !session.started {
        return Err(ApiError::NotStarted);
    }

    let player = session
        .player(player_id)
        .ok_or_else(|| ApiError::NotFound(String::from("player not found")))?;
    Ok(Json(player.session_collection.clone()))
}
