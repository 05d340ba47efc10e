//! Render an entity-annotated message as escaped HTML.
//!
//! This is the reverse pipeline: escape the raw content, re-base entity
//! offsets into escaped-text coordinates, then merge every entity's open
//! and close tag into one insertion list sorted by position and
//! priority. The sort is the correctness-critical step: at a shared
//! boundary, lower-priority opens come first and their closes last, so
//! overlapping spans never produce crossing tags.

use spandown_core::{rebase, Expansion, MessageLike, StyleEntity};

use crate::service::SpandownOptions;
use crate::tags::TagSet;

/// An open- or close-tag event at a position in the escaped text.
struct Insertion {
    position: usize,
    priority: i32,
    tag: String,
}

/// Render a wire message with the given options.
pub(crate) fn render_message(msg: &MessageLike, options: &SpandownOptions) -> String {
    let content = msg
        .content()
        .unwrap_or(&options.missing_content_placeholder);
    render_content(content, msg.style_entities(), &options.tags)
}

pub(crate) fn render_content(content: &str, entities: &[StyleEntity], tags: &TagSet) -> String {
    // Escape pass over UTF-16 code units, recording how much each
    // reserved character grew. Entity offsets index the raw text, so
    // this must happen before any tag insertion.
    let units: Vec<u16> = content.encode_utf16().collect();
    let mut escaped: Vec<u16> = Vec::with_capacity(units.len());
    let mut expansions: Vec<Expansion> = Vec::new();

    for (index, &unit) in units.iter().enumerate() {
        match expansion_of(unit) {
            Some(replacement) => {
                escaped.extend(replacement.encode_utf16());
                expansions.push((index, replacement.len() - 1));
            }
            None => escaped.push(unit),
        }
    }

    let rebased = rebase(entities, &expansions, units.len());

    // Two insertion records per mapped entity; unmapped wire types are
    // skipped without touching the text.
    let mut insertions: Vec<Insertion> = Vec::new();
    for entity in &rebased {
        let Some(rule) = tags.get(entity.kind.as_wire()) else {
            continue;
        };
        insertions.push(Insertion {
            position: entity.offset,
            priority: rule.priority,
            tag: rule.render_open(entity),
        });
        insertions.push(Insertion {
            position: entity.end(),
            priority: -rule.priority,
            tag: rule.close.clone(),
        });
    }
    insertions.sort_by_key(|insertion| (insertion.position, insertion.priority));

    let mut out = String::with_capacity(escaped.len() + insertions.len() * 8);
    let mut pos = 0;
    for insertion in &insertions {
        out.push_str(&String::from_utf16_lossy(&escaped[pos..insertion.position]));
        out.push_str(&insertion.tag);
        pos = insertion.position;
    }
    out.push_str(&String::from_utf16_lossy(&escaped[pos..]));
    out
}

fn expansion_of(unit: u16) -> Option<&'static str> {
    match char::from_u32(u32::from(unit)) {
        Some('&') => Some("&amp;"),
        Some('<') => Some("&lt;"),
        Some('>') => Some("&gt;"),
        Some('"') => Some("&quot;"),
        Some('\'') => Some("&#039;"),
        Some('\n') => Some("<br />"),
        _ => None,
    }
}
