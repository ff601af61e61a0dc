//! Error types for session storage.

use awf_core::{PlayerId, SessionError, SessionId};

/// Errors a [`SessionStore`](crate::SessionStore) reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No session with this ID exists.
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// The session exists but has no such player.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// The session has started and no longer accepts changes.
    #[error("session {0} already started")]
    AlreadyStarted(SessionId),

    /// The backend failed for a reason unrelated to the caller's input.
    #[error("storage error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Attach the session ID to a state machine outcome.
    pub const fn from_session(session_id: SessionId, error: SessionError) -> Self {
        match error {
            SessionError::AlreadyStarted => Self::AlreadyStarted(session_id),
            SessionError::PlayerNotFound(player_id) => Self::PlayerNotFound(player_id),
        }
    }
}
