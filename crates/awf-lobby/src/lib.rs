//! Realtime registry ("lobby") of live player connections.
//!
//! The [`Lobby`] maps each session to the outbound channel of every player
//! currently connected to it and fans session snapshots out to them. It
//! is explicitly constructed and handed to the server at startup, so tests
//! build isolated instances.
//!
//! # Concurrency
//!
//! One registry-wide [`Mutex`] serializes every read and mutation of the
//! connection map. Sends on a [`PlayerChannel`] never block, so the lock is
//! never held across an await point. A failed send means the peer's
//! connection task has gone away; the channel is evicted in the same call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use awf_core::{PlayerId, ServerMessage, SessionId, SessionView};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Outbound channel to one connected player.
///
/// The receiving half is drained by the connection's writer task.
pub type PlayerChannel = mpsc::UnboundedSender<ServerMessage>;

/// Errors reported by [`Lobby::register_connection`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    /// The session was never announced with [`Lobby::new_session`], or has
    /// since been garbage-collected.
    #[error("session not found")]
    SessionNotFound,

    /// The player already holds a live connection to this session.
    #[error("player already registered")]
    PlayerAlreadyRegistered,
}

/// Outcome of [`Lobby::unregister`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unregistered {
    /// The caller's channel was registered and has been removed.
    Removed,
    /// No channel was registered, e.g. it was evicted by a failed broadcast.
    Missing,
    /// A newer connection for the same player holds the slot.
    Superseded,
}

type Connections = HashMap<SessionId, HashMap<PlayerId, PlayerChannel>>;

/// Live player connections, grouped by session.
#[derive(Debug, Default)]
pub struct Lobby {
    sessions: Mutex<Connections>,
}

impl Lobby {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce a session so players can connect to it.
    ///
    /// Announcing a session that already has connections keeps them.
    pub fn new_session(&self, session_id: SessionId) {
        let mut sessions = self.lock();
        sessions.entry(session_id).or_default();
        debug!(%session_id, sessions = sessions.len(), "session announced to lobby");
    }

    /// Register a player's outbound channel.
    ///
    /// A previously registered channel whose receiver has been dropped no
    /// longer counts as live and is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::SessionNotFound`] for a session that was never
    /// announced, and [`LobbyError::PlayerAlreadyRegistered`] if the player
    /// already holds a live channel; the existing registration is kept.
    pub fn register_connection(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
        channel: PlayerChannel,
    ) -> Result<(), LobbyError> {
        let mut sessions = self.lock();
        let connections = sessions
            .get_mut(&session_id)
            .ok_or(LobbyError::SessionNotFound)?;

        if connections
            .get(&player_id)
            .is_some_and(|existing| !existing.is_closed())
        {
            return Err(LobbyError::PlayerAlreadyRegistered);
        }

        connections.insert(player_id, channel);
        info!(%session_id, %player_id, connections = connections.len(), "player connected");
        Ok(())
    }

    /// Send a snapshot to every player connected to `session_id`.
    ///
    /// Returns the number of channels the snapshot was delivered to. An
    /// unknown session, or one without connections, is a no-op. Channels
    /// that fail the send are evicted.
    pub fn broadcast(&self, session_id: SessionId, view: &SessionView) -> usize {
        let mut sessions = self.lock();
        let Some(connections) = sessions.get_mut(&session_id) else {
            return 0;
        };

        let message = ServerMessage::Session(Arc::new(view.clone()));
        let mut dead = Vec::new();
        for (player_id, channel) in connections.iter() {
            if channel.send(message.clone()).is_err() {
                dead.push(*player_id);
            }
        }

        for player_id in &dead {
            connections.remove(player_id);
            warn!(%session_id, %player_id, "could not send to player, connection evicted");
        }

        let delivered = connections.len();
        debug!(%session_id, delivered, evicted = dead.len(), "session broadcast");
        delivered
    }

    /// Remove a player's channel, if it is still the registered one.
    ///
    /// A connection that was replaced by a newer one for the same player
    /// leaves the newer channel in place and gets [`Unregistered::Superseded`].
    /// When this leaves the session without connections, the session entry
    /// itself is dropped from the registry.
    pub fn unregister(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
        channel: &PlayerChannel,
    ) -> Unregistered {
        let mut sessions = self.lock();
        let Some(connections) = sessions.get_mut(&session_id) else {
            return Unregistered::Missing;
        };

        let outcome = match connections.get(&player_id) {
            Some(existing) if existing.same_channel(channel) => {
                connections.remove(&player_id);
                info!(%session_id, %player_id, "player disconnected");
                Unregistered::Removed
            }
            Some(_) => {
                debug!(%session_id, %player_id, "stale connection left, newer one kept");
                Unregistered::Superseded
            }
            None => Unregistered::Missing,
        };

        if connections.is_empty() {
            sessions.remove(&session_id);
            debug!(%session_id, "no connections left, session dropped from lobby");
        }
        outcome
    }

    /// Whether `session_id` is currently known to the registry.
    pub fn contains_session(&self, session_id: SessionId) -> bool {
        self.lock().contains_key(&session_id)
    }

    /// Number of channels registered for `session_id`.
    pub fn connection_count(&self, session_id: SessionId) -> usize {
        self.lock().get(&session_id).map_or(0, HashMap::len)
    }

    /// Acquire the registry lock.
    ///
    /// No operation leaves the map half-updated before it can panic, so a
    /// poisoned lock still guards a consistent map.
    fn lock(&self) -> MutexGuard<'_, Connections> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
