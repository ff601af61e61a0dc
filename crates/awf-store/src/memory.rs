//! In-memory [`SessionStore`] backend.
//!
//! One [`RwLock`] guards the whole session map: reads share it, every
//! mutation takes it exclusively, which serializes writers per session
//! (and, more coarsely, across sessions).

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use awf_core::{Catalog, Options, PlayerId, PlayerRegistration, PlayerUpdate, Session, SessionId};
use tracing::{debug, info};

use crate::{SessionStore, StoreError};

/// Sessions held in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the lock is poisoned.
    pub fn session_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<SessionId, Session>>, StoreError> {
        self.sessions
            .read()
            .map_err(|e| StoreError::Internal(format!("session store lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<SessionId, Session>>, StoreError> {
        self.sessions
            .write()
            .map_err(|e| StoreError::Internal(format!("session store lock poisoned: {e}")))
    }
}

impl SessionStore for MemoryStore {
    fn create_session(&self, options: Options) -> Result<SessionId, StoreError> {
        let mut sessions = self.write()?;

        let mut id = SessionId::new();
        while sessions.contains_key(&id) {
            id = SessionId::new();
        }
        sessions.insert(id, Session::new(options));

        info!(session_id = %id, sessions = sessions.len(), "session created");
        Ok(id)
    }

    fn get_session(&self, session_id: SessionId) -> Result<Session, StoreError> {
        self.read()?
            .get(&session_id)
            .cloned()
            .ok_or(StoreError::SessionNotFound(session_id))
    }

    fn add_player(
        &self,
        session_id: SessionId,
        registration: PlayerRegistration,
    ) -> Result<(PlayerId, Session), StoreError> {
        let mut sessions = self.write()?;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(StoreError::SessionNotFound(session_id))?;

        let player_id = session
            .add_player(registration)
            .map_err(|e| StoreError::from_session(session_id, e))?;

        info!(%session_id, %player_id, players = session.player_count(), "player joined");
        Ok((player_id, session.clone()))
    }

    fn update_player(
        &self,
        catalog: &Catalog,
        session_id: SessionId,
        player_id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<Session, StoreError> {
        let mut sessions = self.write()?;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(StoreError::SessionNotFound(session_id))?;

        let check = session
            .update_player(catalog, player_id, update)
            .map_err(|e| StoreError::from_session(session_id, e))?;

        debug!(%session_id, %player_id, ready = update.ready, ?check, "player updated");
        Ok(session.clone())
    }

    fn remove_player(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
    ) -> Result<Option<Session>, StoreError> {
        let mut sessions = self.write()?;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(StoreError::SessionNotFound(session_id))?;

        session
            .remove_player(player_id)
            .map_err(|e| StoreError::from_session(session_id, e))?;

        if session.is_empty() {
            sessions.remove(&session_id);
            info!(%session_id, "last player left, session removed");
            return Ok(None);
        }

        info!(%session_id, %player_id, players = session.player_count(), "player left");
        Ok(Some(session.clone()))
    }
}
