//! Tag registry for the entity-to-HTML renderer.
//!
//! Maps wire entity types to open/close tag pairs with a fixed priority.
//! At a shared text position, lower-priority opens are emitted first and
//! their closes last, so overlapping entities always produce well-nested
//! markup.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use spandown_core::StyleEntity;

/// How to produce the opening tag for an entity.
#[derive(Debug, Clone)]
pub enum OpenTag {
    /// A fixed literal, e.g. `<b>`
    Literal(String),
    /// An anchor whose `href` comes from the entity's URL
    Link,
}

/// One entry of the registry: a tag pair and its nesting priority.
/// Lower priorities wrap higher ones when spans coincide.
#[derive(Debug, Clone)]
pub struct TagRule {
    pub priority: i32,
    pub open: OpenTag,
    pub close: String,
}

impl TagRule {
    /// Create a rule with a literal open tag
    pub fn literal(priority: i32, open: &str, close: &str) -> Self {
        Self {
            priority,
            open: OpenTag::Literal(open.to_string()),
            close: close.to_string(),
        }
    }

    /// Render the opening tag for a concrete entity
    pub fn render_open(&self, entity: &StyleEntity) -> String {
        match &self.open {
            OpenTag::Literal(tag) => tag.clone(),
            OpenTag::Link => format!(
                "<a href=\"{}\">",
                escape_attr(entity.url.as_deref().unwrap_or_default())
            ),
        }
    }
}

/// Insertion-ordered collection of tag rules, keyed by wire type.
#[derive(Debug, Clone)]
pub struct TagSet {
    rules: IndexMap<String, TagRule>,
}

static DEFAULT_TAGS: Lazy<TagSet> = Lazy::new(TagSet::builtin);

impl TagSet {
    /// The built-in rules for the five rendered wire types
    pub fn builtin() -> Self {
        let mut set = Self {
            rules: IndexMap::new(),
        };
        set.add("bold", TagRule::literal(1, "<b>", "</b>"));
        set.add("italic", TagRule::literal(2, "<i>", "</i>"));
        set.add("code", TagRule::literal(3, "<pre><code>", "</code></pre>"));
        set.add(
            "url",
            TagRule {
                priority: 4,
                open: OpenTag::Link,
                close: "</a>".to_string(),
            },
        );
        set.add(
            "text_link",
            TagRule {
                priority: 5,
                open: OpenTag::Link,
                close: "</a>".to_string(),
            },
        );
        set
    }

    /// Register a rule for a wire type, replacing any existing one
    pub fn add(&mut self, wire: &str, rule: TagRule) {
        self.rules.insert(wire.to_string(), rule);
    }

    /// Look up the rule for a wire type
    pub fn get(&self, wire: &str) -> Option<&TagRule> {
        self.rules.get(wire)
    }
}

impl Default for TagSet {
    fn default() -> Self {
        DEFAULT_TAGS.clone()
    }
}

/// Escape an HTML attribute value
fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
