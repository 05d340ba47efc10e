//! UTF-16 offset bookkeeping.
//!
//! Entity offsets and lengths are measured in UTF-16 code units to match
//! the messaging platform's convention. Both transforms here are pure:
//! they return new entity lists instead of mutating shared ones.

use crate::entity::StyleEntity;

/// Length of a string in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Shift every entity's offset by `delta` code units.
pub fn shift(entities: &[StyleEntity], delta: usize) -> Vec<StyleEntity> {
    entities
        .iter()
        .cloned()
        .map(|mut entity| {
            entity.offset += delta;
            entity
        })
        .collect()
}

/// A single text expansion recorded during HTML escaping: the code unit
/// at `index` (in the raw text) grew by `delta` extra code units.
pub type Expansion = (usize, usize);

/// Re-base entities from raw-text coordinates into escaped-text
/// coordinates.
///
/// `expansions` must be ordered by raw index (the escape pass produces
/// them that way). An entity's start shifts by every expansion strictly
/// before it; its end shifts by every expansion strictly before the end,
/// so an expanded character inside the span stays inside the span.
///
/// Entities whose raw span exceeds `raw_len` are malformed for this text
/// and are dropped.
pub fn rebase(entities: &[StyleEntity], expansions: &[Expansion], raw_len: usize) -> Vec<StyleEntity> {
    let delta_before = |pos: usize| -> usize {
        expansions
            .iter()
            .take_while(|(index, _)| *index < pos)
            .map(|(_, delta)| delta)
            .sum()
    };

    entities
        .iter()
        .filter(|entity| entity.end() <= raw_len)
        .cloned()
        .map(|mut entity| {
            let start = entity.offset + delta_before(entity.offset);
            let end = entity.end() + delta_before(entity.end());
            entity.offset = start;
            entity.length = end - start;
            entity
        })
        .collect()
}
