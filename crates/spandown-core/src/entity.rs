//! Positional style entities and the wire message shapes they annotate.
//!
//! Entities follow the chat-messaging platform convention: an entity is
//! `(kind, offset, length)` over a flat text buffer, with offsets and
//! lengths measured in UTF-16 code units.

use crate::offset::utf16_len;

/// The kind of a style entity, identified on the wire by a lowercase
/// string (`"bold"`, `"text_link"`, …).
///
/// Kinds the engine does not render (mentions, hashtags, custom emoji
/// and whatever else the platform grows) round-trip through `Other`
/// and are skipped by the renderer without dropping any text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntityKind {
    Bold,
    Italic,
    Code,
    Pre,
    Url,
    TextLink,
    #[cfg_attr(feature = "serde", serde(untagged))]
    Other(String),
}

impl EntityKind {
    /// The wire string naming this kind
    pub fn as_wire(&self) -> &str {
        match self {
            EntityKind::Bold => "bold",
            EntityKind::Italic => "italic",
            EntityKind::Code => "code",
            EntityKind::Pre => "pre",
            EntityKind::Url => "url",
            EntityKind::TextLink => "text_link",
            EntityKind::Other(s) => s,
        }
    }

    /// Parse a wire string into a kind (never fails; unknown strings
    /// become `Other`)
    pub fn from_wire(s: &str) -> Self {
        match s {
            "bold" => EntityKind::Bold,
            "italic" => EntityKind::Italic,
            "code" => EntityKind::Code,
            "pre" => EntityKind::Pre,
            "url" => EntityKind::Url,
            "text_link" => EntityKind::TextLink,
            other => EntityKind::Other(other.to_string()),
        }
    }
}

/// A positional style annotation over a text buffer.
///
/// Well-formed entities satisfy `offset + length <= utf16_len(text)`
/// for the text they annotate. The renderer tolerates violations by
/// ignoring the offending entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleEntity {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: EntityKind,
    /// Start position, in UTF-16 code units
    pub offset: usize,
    /// Span length, in UTF-16 code units
    pub length: usize,
    /// Link target, for `text_link` entities
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub url: Option<String>,
    /// Language tag, for `pre` entities
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub language: Option<String>,
}

impl StyleEntity {
    /// Create an entity with no URL or language payload
    pub fn new(kind: EntityKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
            url: None,
            language: None,
        }
    }

    pub fn bold(offset: usize, length: usize) -> Self {
        Self::new(EntityKind::Bold, offset, length)
    }

    pub fn italic(offset: usize, length: usize) -> Self {
        Self::new(EntityKind::Italic, offset, length)
    }

    pub fn code(offset: usize, length: usize) -> Self {
        Self::new(EntityKind::Code, offset, length)
    }

    pub fn pre(offset: usize, length: usize, language: Option<&str>) -> Self {
        Self {
            language: language.map(str::to_string),
            ..Self::new(EntityKind::Pre, offset, length)
        }
    }

    pub fn text_link(offset: usize, length: usize, url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::new(EntityKind::TextLink, offset, length)
        }
    }

    /// End position (`offset + length`), in UTF-16 code units
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Formatting mode accepted by the messaging platform's send call.
///
/// This engine always emits entity-annotated plain text, so messages it
/// produces carry `parse_mode: None`; the enum exists for wire
/// completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseMode {
    Markdown,
    MarkdownV2,
    #[cfg_attr(feature = "serde", serde(rename = "HTML"))]
    Html,
}

/// Output of the forward pipeline: flat text plus style entities.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormattedMessage {
    pub text: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub parse_mode: Option<ParseMode>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub entities: Vec<StyleEntity>,
}

impl FormattedMessage {
    /// A plain-text message with no styling (the fallback shape)
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            parse_mode: None,
            entities: Vec::new(),
        }
    }

    /// Append an italicized status line, separated by a blank line.
    ///
    /// Used to tack a transient note (e.g. a "still thinking" indicator)
    /// onto an already formatted message. Messages carrying a
    /// `parse_mode` are returned unchanged, since entity offsets are
    /// not defined under markup modes.
    pub fn with_italic_suffix(&self, suffix: &str) -> Self {
        if self.parse_mode.is_some() {
            return self.clone();
        }
        let mut entities = self.entities.clone();
        entities.push(StyleEntity::italic(
            utf16_len(&self.text) + 2,
            utf16_len(suffix),
        ));
        Self {
            text: format!("{}\n\n{}", self.text, suffix),
            parse_mode: self.parse_mode,
            entities,
        }
    }
}

/// Input of the reverse pipeline: the wire shape of an inbound message.
///
/// Regular messages carry `text`/`entities`; media messages carry
/// `caption`/`caption_entities`. Entities are defined over the raw,
/// unescaped text.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageLike {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub text: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub caption: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub entities: Option<Vec<StyleEntity>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub caption_entities: Option<Vec<StyleEntity>>,
}

impl MessageLike {
    /// Build a text message with entities
    pub fn from_text(text: &str, entities: Vec<StyleEntity>) -> Self {
        Self {
            text: Some(text.to_string()),
            entities: Some(entities),
            ..Self::default()
        }
    }

    /// Build a captioned media message with entities
    pub fn from_caption(caption: &str, entities: Vec<StyleEntity>) -> Self {
        Self {
            caption: Some(caption.to_string()),
            caption_entities: Some(entities),
            ..Self::default()
        }
    }

    /// Select the message content: `text`, else `caption`
    pub fn content(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }

    /// Select the entity list: `entities`, else `caption_entities`
    pub fn style_entities(&self) -> &[StyleEntity] {
        self.entities
            .as_deref()
            .or(self.caption_entities.as_deref())
            .unwrap_or(&[])
    }
}
