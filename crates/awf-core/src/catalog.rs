//! The card catalog: a read-only `CardId -> CardRecord` table.
//!
//! Loaded once at startup from a JSON object keyed by card id and never
//! mutated afterwards. Every collection filter is parameterized by it.

use std::collections::HashMap;
use std::path::Path;

use crate::card::{CardId, CardRecord};

/// Errors that can occur when loading the card catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog file from disk.
    #[error("failed to read catalog file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The catalog content is not valid JSON of the expected shape.
    #[error("failed to parse catalog JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Static card metadata, keyed by [`CardId`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: HashMap<CardId, CardRecord>,
}

impl Catalog {
    /// Load the catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, or
    /// [`CatalogError::Json`] if it is not a JSON object of card records.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse the catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if the string is not a JSON object of
    /// card records.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let cards: HashMap<CardId, CardRecord> = serde_json::from_str(json)?;
        tracing::debug!(cards = cards.len(), "card catalog parsed");
        Ok(Self { cards })
    }

    /// Look up the metadata for a card.
    pub fn get(&self, id: &CardId) -> Option<&CardRecord> {
        self.cards.get(id)
    }

    /// Number of card variants in the catalog.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the catalog has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl FromIterator<(CardId, CardRecord)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (CardId, CardRecord)>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}
