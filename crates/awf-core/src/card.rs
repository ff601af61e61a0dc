//! Card identity and static card metadata.
//!
//! A [`CardId`] names one printed card variant (an MTG Arena id). Several
//! ids may share a [`CardRecord::name`] when a card was reprinted across
//! sets; the collection algebra treats those as the same card when it
//! caps per-name counts.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Opaque identifier of one printed card variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CardId(pub String);

impl CardId {
    /// Create a card identifier from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl Borrow<str> for CardId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One of the five colors of a card's color identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Color {
    /// White.
    #[serde(rename = "W")]
    White,
    /// Blue.
    #[serde(rename = "U")]
    Blue,
    /// Black.
    #[serde(rename = "B")]
    Black,
    /// Red.
    #[serde(rename = "R")]
    Red,
    /// Green.
    #[serde(rename = "G")]
    Green,
}

/// Printed rarity of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Rarity {
    /// Common.
    Common,
    /// Uncommon.
    Uncommon,
    /// Rare.
    Rare,
    /// Mythic rare.
    Mythic,
}

/// Immutable metadata for a single card variant.
///
/// Field names follow the catalog file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Card name, shared by all reprints of the same card.
    pub name: String,
    /// Converted mana cost.
    #[serde(default)]
    pub cmc: u32,
    /// Color identity; empty for colorless cards.
    #[serde(default)]
    pub color_identity: Vec<Color>,
    /// Set code of this printing.
    pub set: String,
    /// Collector number within the set.
    #[serde(default)]
    pub collector_number: String,
    /// Rarity of this printing.
    pub rarity: Rarity,
}
