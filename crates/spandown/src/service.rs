//! SpandownService - the main entry point for both conversion pipelines.

use spandown_core::{AstNode, FormattedMessage, MessageLike};

use crate::annotate::annotate;
use crate::render::render_message;
use crate::tags::{TagRule, TagSet};
use crate::SpandownError;

/// Options shared by both pipelines
#[derive(Debug, Clone)]
pub struct SpandownOptions {
    /// Prefix for the numbered image caption placeholder
    pub image_caption_prefix: String,

    /// Rendered when a message carries neither text nor caption
    pub missing_content_placeholder: String,

    /// Tag registry used by the HTML renderer
    pub tags: TagSet,
}

impl Default for SpandownOptions {
    fn default() -> Self {
        Self {
            image_caption_prefix: "🖼️Pic.".to_string(),
            missing_content_placeholder: "The message contains no content".to_string(),
            tags: TagSet::default(),
        }
    }
}

/// The main service for converting markdown to annotated messages and
/// annotated messages to HTML.
///
/// Both directions are stateless per call; a service can be shared
/// freely across threads.
pub struct SpandownService {
    options: SpandownOptions,
}

impl SpandownService {
    /// Create a new SpandownService with default options
    pub fn new() -> Self {
        Self {
            options: SpandownOptions::default(),
        }
    }

    /// Create a SpandownService with custom options
    pub fn with_options(options: SpandownOptions) -> Self {
        Self { options }
    }

    /// Get the current options
    pub fn options(&self) -> &SpandownOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut SpandownOptions {
        &mut self.options
    }

    /// Register a custom tag rule for a wire entity type
    pub fn add_tag(&mut self, wire: &str, rule: TagRule) -> &mut Self {
        self.options.tags.add(wire, rule);
        self
    }

    /// Convert a parsed document tree to an annotated message
    pub fn annotate(&self, root: &AstNode) -> FormattedMessage {
        annotate(root, &self.options)
    }

    /// Convert markdown to an annotated message using a caller-supplied
    /// parser.
    ///
    /// This is the only place a parser failure is caught: it degrades to
    /// plain-text passthrough, so the call itself never fails.
    pub fn markdown_to_message_with<P>(&self, markdown: &str, parse: P) -> FormattedMessage
    where
        P: FnOnce(&str) -> Result<AstNode, SpandownError>,
    {
        match parse(markdown) {
            Ok(root) => self.annotate(&root),
            Err(_) => FormattedMessage::plain(markdown),
        }
    }

    /// Convert markdown to an annotated message using the bundled parser
    #[cfg(feature = "markdown")]
    pub fn markdown_to_message(&self, markdown: &str) -> FormattedMessage {
        self.markdown_to_message_with(markdown, crate::markdown::parse_markdown)
    }

    /// Render a wire message as escaped HTML
    pub fn message_to_html(&self, msg: &MessageLike) -> String {
        render_message(msg, &self.options)
    }
}

impl Default for SpandownService {
    fn default() -> Self {
        Self::new()
    }
}
