//! Session configuration chosen at creation time.
//!
//! [`Options`] is immutable for the lifetime of a session and decides which
//! filters the start check applies to the intersected collection.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::card::{Color, Rarity};

/// Copies allowed per card name in a regular session.
pub const MAX_COPIES: u8 = 4;

/// Copies allowed per card name in a singleton session.
pub const SINGLETON_COPIES: u8 = 1;

/// Which kind of game a session builds collections for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct Options {
    /// Cap each card name at one copy instead of four.
    pub singleton: bool,
    /// Keep commons only, regardless of `rarity`.
    pub pauper: bool,
    /// Restrict the collection to a single set code.
    pub set: Option<String>,
    /// Rarities to keep.
    pub rarity: RarityOptions,
    /// Colors to keep.
    pub color: ColorOptions,
}

impl Options {
    /// Per-name copy limit for this session.
    pub const fn max_copies(&self) -> u8 {
        if self.singleton {
            SINGLETON_COPIES
        } else {
            MAX_COPIES
        }
    }

    /// The rarity restriction the start check applies.
    pub const fn rarity_filter(&self) -> RarityOptions {
        if self.pauper {
            RarityOptions::pauper()
        } else {
            self.rarity
        }
    }

    /// The configured set code, ignoring an empty string.
    pub fn set_code(&self) -> Option<&str> {
        self.set.as_deref().filter(|code| !code.is_empty())
    }
}

/// Per-color keep flags. `true` keeps cards of that color.
///
/// Every color is enabled by default, so a missing field in a request
/// never removes cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
#[allow(clippy::struct_excessive_bools)]
pub struct ColorOptions {
    /// Keep white cards.
    pub white: bool,
    /// Keep blue cards.
    pub blue: bool,
    /// Keep black cards.
    pub black: bool,
    /// Keep red cards.
    pub red: bool,
    /// Keep green cards.
    pub green: bool,
    /// Keep cards with an empty color identity.
    pub colorless: bool,
}

impl ColorOptions {
    /// Options with every color enabled.
    pub const ALL: Self = Self {
        white: true,
        blue: true,
        black: true,
        red: true,
        green: true,
        colorless: true,
    };

    /// Options with every color disabled.
    pub const NONE: Self = Self {
        white: false,
        blue: false,
        black: false,
        red: false,
        green: false,
        colorless: false,
    };

    /// Whether cards of `color` are kept.
    pub const fn allows(self, color: Color) -> bool {
        match color {
            Color::White => self.white,
            Color::Blue => self.blue,
            Color::Black => self.black,
            Color::Red => self.red,
            Color::Green => self.green,
        }
    }

    /// Whether every color (and colorless) is enabled, making the color
    /// filter a no-op.
    pub const fn allows_all(self) -> bool {
        self.white && self.blue && self.black && self.red && self.green && self.colorless
    }
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self::ALL
    }
}

/// Per-rarity keep flags. `true` keeps cards of that rarity.
///
/// With no flag set the session is unrestricted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
#[allow(clippy::struct_excessive_bools)]
pub struct RarityOptions {
    /// Keep commons.
    pub common: bool,
    /// Keep uncommons.
    pub uncommon: bool,
    /// Keep rares.
    pub rare: bool,
    /// Keep mythic rares.
    pub mythic: bool,
}

impl RarityOptions {
    /// Commons only.
    pub const fn pauper() -> Self {
        Self {
            common: true,
            uncommon: false,
            rare: false,
            mythic: false,
        }
    }

    /// Whether cards of `rarity` are kept.
    pub const fn allows(self, rarity: Rarity) -> bool {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Mythic => self.mythic,
        }
    }

    /// Whether this configuration removes any rarity at all.
    pub const fn is_restrictive(self) -> bool {
        let any = self.common || self.uncommon || self.rare || self.mythic;
        let all = self.common && self.uncommon && self.rare && self.mythic;
        any && !all
    }

    /// The rarities to keep, in ascending order.
    pub fn kept(self) -> Vec<Rarity> {
        [Rarity::Common, Rarity::Uncommon, Rarity::Rare, Rarity::Mythic]
            .into_iter()
            .filter(|rarity| self.allows(*rarity))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_unrestricted() {
        let options = Options::default();
        assert!(options.color.allows_all());
        assert!(!options.rarity.is_restrictive());
        assert_eq!(options.set_code(), None);
        assert_eq!(options.max_copies(), MAX_COPIES);
    }

    #[test]
    fn empty_json_object_gives_defaults() {
        let options: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn partial_color_object_keeps_other_colors() {
        let options: Options = serde_json::from_str(r#"{"color": {"red": false}}"#).unwrap();
        assert!(!options.color.allows(Color::Red));
        assert!(options.color.allows(Color::Green));
        assert!(options.color.colorless);
        assert!(!options.color.allows_all());
    }

    #[test]
    fn singleton_caps_at_one() {
        let options = Options {
            singleton: true,
            ..Options::default()
        };
        assert_eq!(options.max_copies(), SINGLETON_COPIES);
    }

    #[test]
    fn empty_set_code_is_ignored() {
        let options = Options {
            set: Some(String::new()),
            ..Options::default()
        };
        assert_eq!(options.set_code(), None);
    }

    #[test]
    fn pauper_keeps_only_commons() {
        let rarity = RarityOptions::pauper();
        assert!(rarity.is_restrictive());
        assert_eq!(rarity.kept(), vec![Rarity::Common]);
    }

    #[test]
    fn pauper_flag_overrides_rarity_flags() {
        let options: Options =
            serde_json::from_str(r#"{"pauper": true, "rarity": {"rare": true}}"#).unwrap();
        assert!(options.pauper);
        assert_eq!(options.rarity_filter(), RarityOptions::pauper());
        assert_eq!(options.rarity_filter().kept(), vec![Rarity::Common]);
    }

    #[test]
    fn rarity_flags_apply_without_pauper() {
        let options: Options = serde_json::from_str(r#"{"rarity": {"rare": true}}"#).unwrap();
        assert_eq!(options.rarity_filter().kept(), vec![Rarity::Rare]);
    }

    #[test]
    fn all_rarities_is_not_restrictive() {
        let rarity = RarityOptions {
            common: true,
            uncommon: true,
            rare: true,
            mythic: true,
        };
        assert!(!rarity.is_restrictive());
    }
}
