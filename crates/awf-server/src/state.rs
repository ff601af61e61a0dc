//! Shared application state for the session server.
//!
//! [`AppState`] is the orchestration layer's view of the core: the
//! session store, the realtime lobby and the card catalog. It is built
//! once at startup, wrapped in [`Arc`] and injected via Axum's `State`
//! extractor.

use std::sync::Arc;

use awf_core::{Catalog, SessionId, SessionView};
use awf_lobby::Lobby;
use awf_store::SessionStore;

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// Session storage backend.
    pub store: Arc<dyn SessionStore>,
    /// Registry of live player connections.
    pub lobby: Arc<Lobby>,
    /// Read-only card catalog.
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Create application state with a fresh, empty lobby.
    pub fn new(store: Arc<dyn SessionStore>, catalog: Catalog) -> Self {
        Self::with_lobby(store, Arc::new(Lobby::new()), catalog)
    }

    /// Create application state around an existing lobby.
    pub fn with_lobby(store: Arc<dyn SessionStore>, lobby: Arc<Lobby>, catalog: Catalog) -> Self {
        Self {
            store,
            lobby,
            catalog: Arc::new(catalog),
        }
    }

    /// Push a session snapshot to every live connection of the session.
    ///
    /// Returns the number of connections reached; zero is not an error.
    pub fn broadcast(&self, session_id: SessionId, view: &SessionView) -> usize {
        self.lobby.broadcast(session_id, view)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("lobby", &self.lobby)
            .field("catalog_cards", &self.catalog.len())
            .finish_non_exhaustive()
    }
}
