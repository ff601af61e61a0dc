//! The session state machine.
//!
//! A [`Session`] is `Open` until every one of at least two players is
//! ready, at which point it computes the shared collection and becomes
//! `Started`, irreversibly. Storage owns sessions; callers mutate them by
//! read-modify-write and never keep a copy beyond one operation.
//!
//! # Start check
//!
//! ```text
//! intersect(all complete collections)
//!     -> filter_colors    (unless every color is enabled)
//!     -> filter_set       (if a set code is configured)
//!     -> max_per_card     (4, or 1 for singleton)
//!     -> filter_rarities  (if a rarity restriction or pauper is configured)
//!     -> written to every player, then `started = true`
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::collection::Collection;
use crate::ids::PlayerId;
use crate::options::Options;
use crate::protocol::{PlayerRegistration, PlayerUpdate, PlayerView, SessionView};

/// Minimum number of players before a session can start itself.
pub const MIN_PLAYERS: usize = 2;

/// Outcomes the state machine reports instead of mutating the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session has started and no longer accepts changes.
    #[error("session already started")]
    AlreadyStarted,

    /// No player with this ID is part of the session.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
}

/// Result of a readiness update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCheck {
    /// The session is still open.
    Waiting,
    /// This update started the session.
    Started,
}

/// A player's state inside a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    /// Display name.
    pub name: String,
    /// Whether the player wants the session to start.
    pub ready: bool,
    /// The full pool submitted at registration.
    pub complete_collection: Collection,
    /// The shared result; empty until the session starts.
    pub session_collection: Collection,
}

impl PlayerData {
    fn from_registration(registration: PlayerRegistration) -> Self {
        Self {
            name: registration.name,
            ready: false,
            complete_collection: registration.collection,
            session_collection: Collection::new(),
        }
    }
}

/// One play session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Players keyed by their identifier.
    pub players: BTreeMap<PlayerId, PlayerData>,
    /// Whether the session has started.
    pub started: bool,
    /// Configuration chosen at creation.
    pub options: Options,
}

impl Session {
    /// Create an open session with no players.
    pub const fn new(options: Options) -> Self {
        Self {
            players: BTreeMap::new(),
            started: false,
            options,
        }
    }

    /// Number of players in the session.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether the last player has left.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Look up a player.
    pub fn player(&self, id: PlayerId) -> Option<&PlayerData> {
        self.players.get(&id)
    }

    /// Add a player with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyStarted`] once the session has started;
    /// the session is left unchanged.
    pub fn add_player(&mut self, registration: PlayerRegistration) -> Result<PlayerId, SessionError> {
        if self.started {
            return Err(SessionError::AlreadyStarted);
        }

        let mut id = PlayerId::new();
        while self.players.contains_key(&id) {
            id = PlayerId::new();
        }

        self.players
            .insert(id, PlayerData::from_registration(registration));
        debug!(player_id = %id, players = self.players.len(), "player added");
        Ok(id)
    }

    /// Set a player's readiness and run the start check.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyStarted`] if the session has started or
    /// [`SessionError::PlayerNotFound`] for an unknown player. In both cases
    /// the session is left unchanged.
    pub fn update_player(
        &mut self,
        catalog: &Catalog,
        player_id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<StartCheck, SessionError> {
        if self.started {
            return Err(SessionError::AlreadyStarted);
        }

        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(SessionError::PlayerNotFound(player_id))?;
        player.ready = update.ready;

        Ok(self.start_check(catalog))
    }

    /// Remove a player and un-ready everyone who remains.
    ///
    /// A departure invalidates the readiness consensus, so every remaining
    /// player must confirm again. After the session has started this does
    /// not touch `started` or any player's session collection.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PlayerNotFound`] for an unknown player.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<PlayerData, SessionError> {
        let removed = self
            .players
            .remove(&player_id)
            .ok_or(SessionError::PlayerNotFound(player_id))?;

        for player in self.players.values_mut() {
            player.ready = false;
        }

        debug!(%player_id, players = self.players.len(), "player removed");
        Ok(removed)
    }

    /// Whether the start conditions currently hold.
    pub fn can_start(&self) -> bool {
        !self.started
            && self.players.len() >= MIN_PLAYERS
            && self.players.values().all(|player| player.ready)
    }

    /// Public snapshot of the session for the wire.
    pub fn view(&self) -> SessionView {
        let session_collection = if self.started {
            self.players
                .values()
                .next()
                .map(|player| player.session_collection.clone())
        } else {
            None
        };

        SessionView {
            players: self
                .players
                .iter()
                .map(|(&id, player)| {
                    (
                        id,
                        PlayerView {
                            name: player.name.clone(),
                            ready: player.ready,
                        },
                    )
                })
                .collect(),
            started: self.started,
            session_collection,
        }
    }

    fn start_check(&mut self, catalog: &Catalog) -> StartCheck {
        if !self.can_start() {
            return StartCheck::Waiting;
        }

        let collection = self.constructed(catalog);
        debug!(
            players = self.players.len(),
            cards = collection.len(),
            "session starting"
        );

        for player in self.players.values_mut() {
            player.session_collection = collection.clone();
        }
        self.started = true;

        StartCheck::Started
    }

    /// Compute the shared collection for a constructed session.
    fn constructed(&self, catalog: &Catalog) -> Collection {
        let mut players = self.players.values();
        let Some(first) = players.next() else {
            return Collection::new();
        };

        let mut collection = first.complete_collection.clone();
        for player in players {
            collection.intersect(&player.complete_collection);
        }

        let options = &self.options;
        if !options.color.allows_all() {
            collection.filter_colors(catalog, options.color);
        }
        if let Some(set) = options.set_code() {
            collection.filter_set(catalog, set);
        }
        collection.max_per_card(catalog, options.max_copies());
        let rarity = options.rarity_filter();
        if rarity.is_restrictive() {
            collection.filter_rarities(catalog, &rarity.kept());
        }

        collection
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::card::{CardId, CardRecord, Color, Rarity};
    use crate::options::{ColorOptions, RarityOptions};

    fn record(name: &str, colors: &[Color], set: &str, rarity: Rarity) -> CardRecord {
        CardRecord {
            name: name.to_owned(),
            cmc: 2,
            color_identity: colors.to_vec(),
            set: set.to_owned(),
            collector_number: String::from("7"),
            rarity,
        }
    }

    fn catalog() -> Catalog {
        [
            ("c1", record("Card One", &[Color::Red], "dom", Rarity::Common)),
            ("c2", record("Card Two", &[Color::Blue], "dom", Rarity::Rare)),
            ("c3", record("Card Three", &[Color::Green], "m19", Rarity::Uncommon)),
            ("c1-reprint", record("Card One", &[Color::Red], "m19", Rarity::Common)),
        ]
        .into_iter()
        .map(|(id, card)| (CardId::from(id), card))
        .collect()
    }

    fn registration(name: &str, entries: &[(&str, u8)]) -> PlayerRegistration {
        PlayerRegistration {
            name: name.to_owned(),
            collection: entries
                .iter()
                .map(|&(id, count)| (CardId::from(id), count))
                .collect(),
        }
    }

    fn ready(catalog: &Catalog, session: &mut Session, id: PlayerId) -> StartCheck {
        session
            .update_player(catalog, id, PlayerUpdate { ready: true })
            .unwrap()
    }

    #[test]
    fn add_player_starts_unready() {
        let mut session = Session::new(Options::default());
        let id = session.add_player(registration("A", &[("c1", 1)])).unwrap();
        let player = session.player(id).unwrap();
        assert!(!player.ready);
        assert!(player.session_collection.is_empty());
        assert_eq!(session.player_count(), 1);
    }

    #[test]
    fn single_ready_player_never_starts() {
        let catalog = catalog();
        let mut session = Session::new(Options::default());
        let a = session.add_player(registration("A", &[("c1", 1)])).unwrap();
        assert_eq!(ready(&catalog, &mut session, a), StartCheck::Waiting);
        assert!(!session.started);
    }

    #[test]
    fn starts_when_all_ready() {
        let catalog = catalog();
        let mut session = Session::new(Options::default());
        let a = session
            .add_player(registration("A", &[("c1", 2), ("c2", 1)]))
            .unwrap();
        let b = session
            .add_player(registration("B", &[("c1", 1), ("c3", 3)]))
            .unwrap();

        assert_eq!(ready(&catalog, &mut session, a), StartCheck::Waiting);
        assert!(!session.started);
        assert_eq!(ready(&catalog, &mut session, b), StartCheck::Started);
        assert!(session.started);

        let expected: Collection = [(CardId::from("c1"), 1)].into_iter().collect();
        for player in session.players.values() {
            assert_eq!(player.session_collection, expected);
        }
        assert_eq!(session.view().session_collection, Some(expected));
    }

    #[test]
    fn unready_update_does_not_start() {
        let catalog = catalog();
        let mut session = Session::new(Options::default());
        let a = session.add_player(registration("A", &[("c1", 1)])).unwrap();
        let b = session.add_player(registration("B", &[("c1", 1)])).unwrap();
        ready(&catalog, &mut session, a);
        let check = session
            .update_player(&catalog, b, PlayerUpdate { ready: false })
            .unwrap();
        assert_eq!(check, StartCheck::Waiting);
    }

    #[test]
    fn singleton_caps_result() {
        let catalog = catalog();
        let mut session = Session::new(Options {
            singleton: true,
            ..Options::default()
        });
        let a = session.add_player(registration("A", &[("c1", 3)])).unwrap();
        let b = session.add_player(registration("B", &[("c1", 3)])).unwrap();
        ready(&catalog, &mut session, a);
        ready(&catalog, &mut session, b);
        let expected: Collection = [(CardId::from("c1"), 1)].into_iter().collect();
        assert_eq!(session.player(a).unwrap().session_collection, expected);
    }

    #[test]
    fn filters_apply_to_result() {
        let catalog = catalog();
        let mut session = Session::new(Options {
            set: Some(String::from("dom")),
            rarity: RarityOptions::pauper(),
            color: ColorOptions {
                blue: false,
                ..ColorOptions::ALL
            },
            ..Options::default()
        });
        let pool = [("c1", 4), ("c2", 4), ("c3", 4), ("c1-reprint", 4)];
        let a = session.add_player(registration("A", &pool)).unwrap();
        let b = session.add_player(registration("B", &pool)).unwrap();
        ready(&catalog, &mut session, a);
        ready(&catalog, &mut session, b);
        let expected: Collection = [(CardId::from("c1"), 4)].into_iter().collect();
        assert_eq!(session.player(b).unwrap().session_collection, expected);
    }

    #[test]
    fn pauper_session_keeps_only_commons() {
        let catalog = catalog();
        let options: Options = serde_json::from_str(r#"{"pauper": true}"#).unwrap();
        let mut session = Session::new(options);
        let pool = [("c1", 2), ("c2", 2), ("c3", 2)];
        let a = session.add_player(registration("A", &pool)).unwrap();
        let b = session.add_player(registration("B", &pool)).unwrap();
        ready(&catalog, &mut session, a);
        ready(&catalog, &mut session, b);
        let expected: Collection = [(CardId::from("c1"), 2)].into_iter().collect();
        assert_eq!(session.player(a).unwrap().session_collection, expected);
    }

    #[test]
    fn started_session_rejects_changes() {
        let catalog = catalog();
        let mut session = Session::new(Options::default());
        let a = session.add_player(registration("A", &[("c1", 1)])).unwrap();
        let b = session.add_player(registration("B", &[("c1", 1)])).unwrap();
        ready(&catalog, &mut session, a);
        ready(&catalog, &mut session, b);
        let before = session.clone();

        assert_eq!(
            session.add_player(registration("C", &[("c1", 1)])),
            Err(SessionError::AlreadyStarted)
        );
        assert_eq!(
            session.update_player(&catalog, a, PlayerUpdate { ready: false }),
            Err(SessionError::AlreadyStarted)
        );
        assert_eq!(session, before);
    }

    #[test]
    fn unknown_player_update_is_reported() {
        let catalog = catalog();
        let mut session = Session::new(Options::default());
        let ghost = PlayerId::new();
        assert_eq!(
            session.update_player(&catalog, ghost, PlayerUpdate { ready: true }),
            Err(SessionError::PlayerNotFound(ghost))
        );
    }

    #[test]
    fn removal_unreadies_remaining_players() {
        let catalog = catalog();
        let mut session = Session::new(Options::default());
        let a = session.add_player(registration("A", &[("c1", 1)])).unwrap();
        let b = session.add_player(registration("B", &[("c1", 1)])).unwrap();
        let c = session.add_player(registration("C", &[("c1", 1)])).unwrap();
        ready(&catalog, &mut session, a);
        ready(&catalog, &mut session, b);

        let removed = session.remove_player(c).unwrap();
        assert_eq!(removed.name, "C");
        assert!(session.players.values().all(|player| !player.ready));
        assert!(!session.started);
    }

    #[test]
    fn removal_after_start_keeps_result() {
        let catalog = catalog();
        let mut session = Session::new(Options::default());
        let a = session.add_player(registration("A", &[("c1", 2)])).unwrap();
        let b = session.add_player(registration("B", &[("c1", 2)])).unwrap();
        ready(&catalog, &mut session, a);
        ready(&catalog, &mut session, b);

        session.remove_player(b).unwrap();
        assert!(session.started);
        let remaining = session.player(a).unwrap();
        assert!(!remaining.ready);
        assert_eq!(remaining.session_collection.get(&CardId::from("c1")), Some(2));
    }

    #[test]
    fn removing_last_player_empties_session() {
        let mut session = Session::new(Options::default());
        let a = session.add_player(registration("A", &[("c1", 1)])).unwrap();
        session.remove_player(a).unwrap();
        assert!(session.is_empty());
        assert_eq!(
            session.remove_player(a),
            Err(SessionError::PlayerNotFound(a))
        );
    }

    #[test]
    fn view_hides_complete_collections() {
        let mut session = Session::new(Options::default());
        let a = session.add_player(registration("A", &[("c1", 1)])).unwrap();
        let view = session.view();
        assert_eq!(view.players[&a].name, "A");
        assert!(!view.started);
        assert!(view.session_collection.is_none());
    }
}
