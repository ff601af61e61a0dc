//! Collection algebra: in-place reductions over a `CardId -> count` map.
//!
//! Every transform only shrinks counts or removes entries; nothing is ever
//! added after the initial assignment. The catalog-parameterized filters
//! silently drop ids the [`Catalog`] does not know (e.g. a stale catalog).
//!
//! # Pipeline
//!
//! The start check folds all players' collections with [`Collection::intersect`]
//! and then applies, in this order: [`Collection::filter_colors`],
//! [`Collection::filter_set`], [`Collection::max_per_card`] and
//! [`Collection::filter_rarities`].

use std::collections::HashMap;
use std::collections::hash_map;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::card::{CardId, Rarity};
use crate::catalog::Catalog;
use crate::options::ColorOptions;

/// A multiset of cards: card id to number of copies (0-255).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Collection(pub HashMap<CardId, u8>);

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of copies of `id`, if present.
    pub fn get(&self, id: &CardId) -> Option<u8> {
        self.0.get(id).copied()
    }

    /// Set the number of copies of `id`, returning the previous count.
    pub fn insert(&mut self, id: CardId, count: u8) -> Option<u8> {
        self.0.insert(id, count)
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &CardId) -> bool {
        self.0.contains_key(id)
    }

    /// Number of distinct card ids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of copies across all entries.
    pub fn total_cards(&self) -> u64 {
        self.0.values().map(|&count| u64::from(count)).sum()
    }

    /// Iterate over `(id, count)` entries in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, CardId, u8> {
        self.0.iter()
    }

    /// Reduce `self` to its intersection with `other`.
    ///
    /// Entries absent from `other` are removed; the rest keep the smaller
    /// of the two counts. Only `self` is mutated.
    pub fn intersect(&mut self, other: &Self) {
        self.0.retain(|id, count| match other.0.get(id) {
            Some(&theirs) => {
                *count = (*count).min(theirs);
                true
            }
            None => false,
        });
    }

    /// Collapse reprints of the same card name and cap each name at `max`.
    ///
    /// All ids sharing a name are merged into one representative entry
    /// holding the name-wide (saturating) sum, which is then clamped to
    /// `max`. The representative is the first id visited while pruning;
    /// which id that is follows map iteration order and is not stable
    /// across calls.
    pub fn max_per_card(&mut self, catalog: &Catalog, max: u8) {
        let mut totals: HashMap<&str, Option<u8>> = HashMap::with_capacity(self.0.len());
        for (id, &count) in &self.0 {
            if let Some(card) = catalog.get(id) {
                let total = totals.entry(card.name.as_str()).or_insert(Some(0));
                *total = total.map(|sum| sum.saturating_add(count));
            }
        }

        // Each name's total is taken by the first id that reaches it.
        self.0.retain(|id, count| {
            let Some(slot) = catalog
                .get(id)
                .and_then(|card| totals.get_mut(card.name.as_str()))
            else {
                return false;
            };
            slot.take().is_some_and(|total| {
                *count = total.min(max);
                true
            })
        });
    }

    /// Keep only cards whose rarity is in `keep`.
    pub fn filter_rarities(&mut self, catalog: &Catalog, keep: &[Rarity]) {
        self.0.retain(|id, _| {
            catalog
                .get(id)
                .is_some_and(|card| keep.contains(&card.rarity))
        });
    }

    /// Keep only cards printed in `set`.
    ///
    /// Other printings of the same card from a different set are removed
    /// even when the card itself is legal in `set`.
    pub fn filter_set(&mut self, catalog: &Catalog, set: &str) {
        self.0
            .retain(|id, _| catalog.get(id).is_some_and(|card| card.set == set));
    }

    /// Keep only cards whose whole color identity is enabled in `colors`.
    ///
    /// A multicolor card is removed as soon as one of its colors is
    /// disabled. Colorless cards are kept only if `colors.colorless` is set.
    pub fn filter_colors(&mut self, catalog: &Catalog, colors: ColorOptions) {
        self.0.retain(|id, _| {
            catalog.get(id).is_some_and(|card| {
                if card.color_identity.is_empty() {
                    colors.colorless
                } else {
                    card.color_identity
                        .iter()
                        .all(|&color| colors.allows(color))
                }
            })
        });
    }
}

impl FromIterator<(CardId, u8)> for Collection {
    fn from_iter<I: IntoIterator<Item = (CardId, u8)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a CardId, &'a u8);
    type IntoIter = hash_map::Iter<'a, CardId, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::card::{CardRecord, Color};

    fn record(name: &str, colors: &[Color], set: &str, rarity: Rarity) -> CardRecord {
        CardRecord {
            name: name.to_owned(),
            cmc: 1,
            color_identity: colors.to_vec(),
            set: set.to_owned(),
            collector_number: String::from("1"),
            rarity,
        }
    }

    fn catalog() -> Catalog {
        [
            ("shock-m19", record("Shock", &[Color::Red], "m19", Rarity::Common)),
            ("shock-dom", record("Shock", &[Color::Red], "dom", Rarity::Common)),
            ("elves", record("Llanowar Elves", &[Color::Green], "dom", Rarity::Common)),
            ("teferi", record("Teferi", &[Color::White, Color::Blue], "dom", Rarity::Mythic)),
            ("karn", record("Karn", &[], "dom", Rarity::Mythic)),
            ("opt", record("Opt", &[Color::Blue], "xln", Rarity::Uncommon)),
        ]
        .into_iter()
        .map(|(id, card)| (CardId::from(id), card))
        .collect()
    }

    fn collection(entries: &[(&str, u8)]) -> Collection {
        entries
            .iter()
            .map(|&(id, count)| (CardId::from(id), count))
            .collect()
    }

    #[test]
    fn intersect_keeps_minimum_of_shared_ids() {
        let mut a = collection(&[("c1", 2), ("c2", 1)]);
        let b = collection(&[("c1", 1), ("c3", 3)]);
        a.intersect(&b);
        assert_eq!(a, collection(&[("c1", 1)]));
        assert_eq!(b, collection(&[("c1", 1), ("c3", 3)]));
    }

    #[test]
    fn intersect_with_empty_clears() {
        let mut a = collection(&[("c1", 2)]);
        a.intersect(&Collection::new());
        assert!(a.is_empty());
    }

    #[test]
    fn max_per_card_merges_reprints() {
        let mut c = collection(&[("shock-m19", 3), ("shock-dom", 2), ("elves", 1)]);
        c.max_per_card(&catalog(), 4);
        assert_eq!(c.len(), 2);
        let shock = c
            .get(&CardId::from("shock-m19"))
            .or_else(|| c.get(&CardId::from("shock-dom")))
            .unwrap();
        assert_eq!(shock, 4);
        assert!(!(c.contains(&CardId::from("shock-m19")) && c.contains(&CardId::from("shock-dom"))));
        assert_eq!(c.get(&CardId::from("elves")), Some(1));
    }

    #[test]
    fn max_per_card_singleton_and_unknown_ids() {
        let mut c = collection(&[("elves", 4), ("unknown", 2)]);
        c.max_per_card(&catalog(), 1);
        assert_eq!(c, collection(&[("elves", 1)]));
    }

    #[test]
    fn max_per_card_sum_saturates() {
        let mut c = collection(&[("shock-m19", 200), ("shock-dom", 200)]);
        c.max_per_card(&catalog(), u8::MAX);
        assert_eq!(c.total_cards(), u64::from(u8::MAX));
    }

    #[test]
    fn max_per_card_keeps_a_single_printing_per_name() {
        let mut c = collection(&[("shock-m19", 1), ("shock-dom", 1), ("karn", 2)]);
        c.max_per_card(&catalog(), 4);
        let kept: Vec<_> = c
            .iter()
            .filter(|(id, _)| id.as_str().starts_with("shock"))
            .map(|(_, &count)| count)
            .collect();
        assert_eq!(kept, vec![2]);
        assert_eq!(c.get(&CardId::from("karn")), Some(2));
    }

    #[test]
    fn filter_rarities_keeps_listed() {
        let mut c = collection(&[("elves", 2), ("teferi", 1), ("opt", 4), ("unknown", 1)]);
        c.filter_rarities(&catalog(), &[Rarity::Common, Rarity::Uncommon]);
        assert_eq!(c, collection(&[("elves", 2), ("opt", 4)]));
    }

    #[test]
    fn filter_set_drops_other_printings() {
        let mut c = collection(&[("shock-m19", 2), ("shock-dom", 1), ("opt", 4)]);
        c.filter_set(&catalog(), "dom");
        assert_eq!(c, collection(&[("shock-dom", 1)]));
    }

    #[test]
    fn filter_colors_requires_every_color() {
        let colors = ColorOptions {
            blue: false,
            ..ColorOptions::ALL
        };
        let mut c = collection(&[("teferi", 1), ("opt", 1), ("shock-m19", 1), ("karn", 1)]);
        c.filter_colors(&catalog(), colors);
        assert_eq!(c, collection(&[("shock-m19", 1), ("karn", 1)]));
    }

    #[test]
    fn filter_colors_colorless_flag() {
        let colors = ColorOptions {
            colorless: false,
            ..ColorOptions::ALL
        };
        let mut c = collection(&[("karn", 1), ("elves", 1)]);
        c.filter_colors(&catalog(), colors);
        assert_eq!(c, collection(&[("elves", 1)]));
    }

    #[test]
    fn clone_is_independent() {
        let original = collection(&[("elves", 2)]);
        let mut copy = original.clone();
        copy.intersect(&Collection::new());
        assert_eq!(original.len(), 1);
        assert!(copy.is_empty());
    }

    #[test]
    fn serializes_as_plain_object() {
        let c = collection(&[("67330", 3)]);
        assert_eq!(serde_json::to_string(&c).unwrap(), r#"{"67330":3}"#);
    }
}
