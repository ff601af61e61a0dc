//! Core domain of Arena With Friends.
//!
//! Players register their MTG Arena card collections into a shared
//! session. Once at least two players are ready, the session intersects
//! their collections, applies the session's filters and hands the same
//! resulting collection to every player.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for sessions and players
//! - [`card`] -- Card identifiers and static card metadata
//! - [`catalog`] -- The read-only card catalog loaded at startup
//! - [`collection`] -- Collection algebra (intersect, cap, filters)
//! - [`options`] -- Session configuration
//! - [`session`] -- The session state machine and start check
//! - [`protocol`] -- Wire messages for REST and `WebSocket` clients

pub mod card;
pub mod catalog;
pub mod collection;
pub mod ids;
pub mod options;
pub mod protocol;
pub mod session;

// Re-export primary types for convenience.
pub use card::{CardId, CardRecord, Color, Rarity};
pub use catalog::{Catalog, CatalogError};
pub use collection::Collection;
pub use ids::{PlayerId, SessionId};
pub use options::{ColorOptions, Options, RarityOptions};
pub use protocol::{
    ErrorMessage, PlayerRegistration, PlayerUpdate, PlayerView, ServerMessage, SessionView,
};
pub use session::{PlayerData, Session, SessionError, StartCheck};
