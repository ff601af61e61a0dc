//! Session storage for Arena With Friends.
//!
//! Sessions live in a [`SessionStore`]. The server only ever talks to the
//! trait, so backends are interchangeable; [`MemoryStore`] keeps sessions
//! in process memory for single-instance deployments and tests.
//!
//! # Contract
//!
//! - Every operation on one session is serialized (single writer at a time).
//! - Mutations are read-modify-write on the stored value; callers receive a
//!   snapshot and never hold on to the stored session.
//! - [`SessionStore::update_player`] runs the start check inside the same
//!   critical section as the readiness change, so a session is started at
//!   most once and never observed half-started.

pub mod error;
pub mod memory;

use awf_core::{Catalog, Options, PlayerId, PlayerRegistration, PlayerUpdate, Session, SessionId};

pub use error::StoreError;
pub use memory::MemoryStore;

/// Create, read and mutate sessions.
pub trait SessionStore: Send + Sync {
    /// Create an empty, open session and return its new unique ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the backend fails.
    fn create_session(&self, options: Options) -> Result<SessionId, StoreError>;

    /// Fetch a snapshot of a session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionNotFound`] for an unknown session.
    fn get_session(&self, session_id: SessionId) -> Result<Session, StoreError>;

    /// Add a player to an open session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionNotFound`] for an unknown session and
    /// [`StoreError::AlreadyStarted`] once the session has started.
    fn add_player(
        &self,
        session_id: SessionId,
        registration: PlayerRegistration,
    ) -> Result<(PlayerId, Session), StoreError>;

    /// Apply a readiness update and run the start check atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionNotFound`], [`StoreError::PlayerNotFound`]
    /// or [`StoreError::AlreadyStarted`]; the session is unchanged in each case.
    fn update_player(
        &self,
        catalog: &Catalog,
        session_id: SessionId,
        player_id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<Session, StoreError>;

    /// Remove a player, un-readying the rest.
    ///
    /// Returns `None` when the session became empty and was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionNotFound`] or [`StoreError::PlayerNotFound`].
    fn remove_player(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
    ) -> Result<Option<Session>, StoreError>;
}
