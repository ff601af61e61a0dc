//! Wire messages exchanged with browser clients.
//!
//! Client to server over the player `WebSocket`: [`PlayerUpdate`]
//! (`{"ready": bool}`). Server to client: [`ServerMessage`], either a full
//! [`SessionView`] snapshot or an inline `{"error": "..."}` object.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::collection::Collection;
use crate::ids::PlayerId;

/// Data needed to add a player to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerRegistration {
    /// Display name.
    pub name: String,
    /// The player's complete card pool.
    pub collection: Collection,
}

/// Readiness update sent by a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerUpdate {
    /// Whether the player wants the session to start.
    pub ready: bool,
}

/// Public view of one player inside a [`SessionView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerView {
    /// Display name.
    pub name: String,
    /// Readiness flag.
    pub ready: bool,
}

/// Full session snapshot pushed to every connected player.
///
/// Complete collections stay server-side; the shared collection is
/// included once the session has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SessionView {
    /// Players keyed by their identifier.
    pub players: BTreeMap<PlayerId, PlayerView>,
    /// Whether the session has started.
    pub started: bool,
    /// The computed shared collection, present only once started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub session_collection: Option<Collection>,
}

/// Inline error object for problems that do not warrant an HTTP error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ErrorMessage {
    /// Human-readable description.
    pub error: String,
}

impl ErrorMessage {
    /// Create an error message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// A message sent from the server to one player connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// A session snapshot, shared between all recipients of one broadcast.
    Session(Arc<SessionView>),
    /// A protocol-level error.
    Error(ErrorMessage),
}

impl ServerMessage {
    /// Build an inline error message.
    pub fn error(error: impl Into<String>) -> Self {
        Self::Error(ErrorMessage::new(error))
    }
}
