//! # spandown
//!
//! Convert markdown to entity-annotated chat messages, and annotated
//! messages back to escaped HTML.
//!
//! ## Design
//!
//! Two independent, stateless pipelines share one entity vocabulary:
//!
//! - **Forward**: a parsed markdown tree becomes flat text plus a list
//!   of positional style entities (offsets in UTF-16 code units, the
//!   messaging-platform convention).
//! - **Reverse**: a wire message with text and entities becomes a single
//!   HTML string with escaped content and well-nested tags.
//!
//! The markdown parser is an external collaborator: the bundled
//! `comrak` adapter sits behind the default-on `markdown` feature, and
//! any other parser can be supplied as a closure.
//!
//! ## Example (markdown to message)
//!
//! ```rust
//! use spandown::SpandownService;
//!
//! let service = SpandownService::new();
//! let msg = service.markdown_to_message("Hello **world**");
//! assert_eq!(msg.text, "Hello world");
//! assert_eq!(msg.entities[0].offset, 6);
//! ```
//!
//! ## Example (message to HTML)
//!
//! ```rust
//! use spandown::{MessageLike, SpandownService, StyleEntity};
//!
//! let service = SpandownService::new();
//! let msg = MessageLike::from_text("a & b", vec![StyleEntity::bold(0, 1)]);
//! assert_eq!(service.message_to_html(&msg), "<b>a</b> &amp; b");
//! ```

mod annotate;
#[cfg(feature = "markdown")]
pub mod markdown;
mod render;
mod service;
pub mod tags;

#[cfg(feature = "markdown")]
pub use markdown::parse_markdown;
pub use service::{SpandownOptions, SpandownService};
pub use spandown_core::{
    rebase, shift, utf16_len, AstNode, EntityKind, Expansion, FormattedMessage, MessageLike,
    NodeKind, ParseMode, StyleEntity,
};
pub use tags::{OpenTag, TagRule, TagSet};

/// Error type for spandown operations
#[derive(Debug, thiserror::Error)]
pub enum SpandownError {
    #[error("Markdown parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SpandownError>;
