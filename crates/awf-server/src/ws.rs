//! Player `WebSocket` connection handling.
//!
//! Each connected player gets one task running [`handle_socket`]. It
//! registers an outbound channel with the lobby, then waits for readiness
//! updates until the peer goes away. A separate writer task drains the
//! channel into the socket, so broadcasts never wait on a slow peer while
//! holding the lobby lock.
//!
//! # Disconnect
//!
//! When the peer closes (or the socket errors), the player is unregistered
//! from the lobby, removed from the session (which un-readies everyone
//! else) and the resulting session is broadcast to whoever remains. A
//! connection that has since been replaced by a reconnect does neither.
//!
//! There is no idle timeout: a silent peer keeps its connection open.

use std::sync::Arc;

use awf_core::{PlayerId, PlayerUpdate, ServerMessage, SessionId};
use awf_lobby::{PlayerChannel, Unregistered};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::handlers::{parse_player_id, parse_session_id};
use crate::state::AppState;

/// Upgrade to a player `WebSocket` after checking the player exists.
///
/// # Route
///
/// `GET /api/v1/sessions/{session_id}/players/{player_id}`
pub async fn player_socket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((session_id, player_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    let player_id = parse_player_id(&player_id)?;

    let session = state.store.get_session(session_id)?;
    if session.player(player_id).is_none() {
        return Err(ApiError::NotFound(String::from("player not found")));
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, session_id, player_id)))
}

/// Run one player's connection until the peer disconnects.
async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    session_id: SessionId,
    player_id: PlayerId,
) {
    let (sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_messages(sink, rx));

    // The lobby forgets a session once its last connection leaves; the
    // store has just confirmed the session exists, so announce it again.
    state.lobby.new_session(session_id);
    if let Err(e) = state
        .lobby
        .register_connection(session_id, player_id, tx.clone())
    {
        warn!(%session_id, %player_id, error = %e, "connection refused");
        send(&tx, ServerMessage::error(ApiError::from(e).public_message()));
        drop(tx);
        if let Err(e) = writer.await {
            debug!(error = %e, "writer task failed");
        }
        return;
    }

    match state.store.get_session(session_id) {
        Ok(session) => send(&tx, ServerMessage::Session(Arc::new(session.view()))),
        Err(e) => send(&tx, ServerMessage::error(ApiError::from(e).public_message())),
    }

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(%session_id, %player_id, error = %e, "WebSocket read error");
                break;
            }
        };

        let update: PlayerUpdate = match serde_json::from_str(text.as_str()) {
            Ok(update) => update,
            Err(e) => {
                debug!(%session_id, %player_id, error = %e, "malformed player update");
                send(&tx, ServerMessage::error("malformed player update"));
                continue;
            }
        };

        match state
            .store
            .update_player(&state.catalog, session_id, player_id, update)
        {
            Ok(session) => {
                if session.started {
                    info!(%session_id, players = session.player_count(), "session started");
                }
                state.broadcast(session_id, &session.view());
            }
            Err(e) => {
                let error = ApiError::from(e);
                if let ApiError::Internal(detail) = &error {
                    warn!(%session_id, %player_id, %detail, "could not update player");
                }
                send(&tx, ServerMessage::error(error.public_message()));
            }
        }
    }

    disconnect(&state, session_id, player_id, &tx);
}

/// Unregister, remove the player and tell everyone who is left.
///
/// A connection that was already replaced by a newer one for the same
/// player leaves both the lobby and the session untouched.
fn disconnect(state: &AppState, session_id: SessionId, player_id: PlayerId, tx: &PlayerChannel) {
    if state.lobby.unregister(session_id, player_id, tx) == Unregistered::Superseded {
        debug!(%session_id, %player_id, "player reconnected, keeping session entry");
        return;
    }

    match state.store.remove_player(session_id, player_id) {
        Ok(Some(session)) => {
            state.broadcast(session_id, &session.view());
        }
        Ok(None) => info!(%session_id, "last player left"),
        Err(e) => debug!(%session_id, %player_id, error = %e, "player already removed"),
    }
}

/// Queue a message for this connection's writer.
fn send(tx: &PlayerChannel, message: ServerMessage) {
    if tx.send(message).is_err() {
        debug!("writer task already finished");
    }
}

/// Forward queued messages to the socket as JSON text frames.
async fn write_messages(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) {
    while let Some(message) = rx.recv().await {
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize server message: {e}");
                continue;
            }
        };
        if sink.send(Message::Text(json.into())).await.is_err() {
            debug!("WebSocket client disconnected (send failed)");
            return;
        }
    }

    if let Err(e) = sink.close().await {
        debug!(error = %e, "WebSocket close failed");
    }
}
