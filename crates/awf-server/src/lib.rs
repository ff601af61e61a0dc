//! Session server for Arena With Friends.
//!
//! This crate is the orchestration layer around the core: an Axum HTTP
//! server that exposes
//!
//! - **REST endpoints** for creating sessions, registering players and
//!   fetching the shared collection once a session has started
//! - **`WebSocket` endpoint** per player for readiness updates and
//!   real-time session snapshots, fanned out through the
//!   [`Lobby`](awf_lobby::Lobby)
//!
//! # Architecture
//!
//! Handlers never keep a session between calls: every change is a
//! read-modify-write through the [`SessionStore`](awf_store::SessionStore),
//! and every broadcast carries the session value the store just committed.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
