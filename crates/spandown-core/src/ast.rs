//! Markdown AST node structure consumed by the forward pipeline.
//!
//! This module provides a parser-agnostic document tree. Any markdown
//! parser can convert its output to this structure; the bundled `comrak`
//! adapter in the `spandown` crate is one such producer.

/// Node kinds known to the conversion engine.
///
/// Kinds outside the style-mapping table (everything except `Emphasis`,
/// `Strong`, `Link`, `Code`, `CodeBlock`, `List`, `Table` and `Image`)
/// are structure-only: their text and their children's entities pass
/// through, but they contribute no styling of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Root document container
    Document,
    /// Paragraph (appends a trailing blank line)
    Paragraph,
    /// Plain text leaf
    Text,
    /// Emphasis (italic)
    Emphasis,
    /// Strong emphasis (bold)
    Strong,
    /// Inline code
    Code,
    /// Fenced or indented code block
    CodeBlock,
    /// Link with URL and optional title
    Link,
    /// Image with alt text, URL, and optional title
    Image,
    /// List (emitted verbatim from its raw source slice)
    List,
    /// Table (emitted verbatim, annotated as a preformatted region)
    Table,
    /// Heading (structure-only)
    Heading,
    /// Block quote (structure-only)
    BlockQuote,
    /// Hard or soft line break (structure-only)
    Break,
    /// Raw HTML (structure-only)
    Html,
    /// Thematic break (structure-only)
    ThematicBreak,
    /// Any kind the engine has no knowledge of
    Other,
}

/// A markdown AST node.
///
/// Leaves carry their literal text in `value`; `List` and `Table` nodes
/// carry the verbatim source slice in `raw`. Kind-specific fields
/// (`url`/`title` for links, `alt`/`title` for images, `lang` for code
/// blocks) are plain options so the struct stays cheap to hand-build in
/// tests.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    /// Node kind
    pub kind: NodeKind,
    /// Child nodes, empty for leaves
    pub children: Vec<AstNode>,
    /// Literal text for leaf nodes
    pub value: Option<String>,
    /// Verbatim source slice (used for `List` and `Table`)
    pub raw: Option<String>,
    /// Link or image target URL
    pub url: Option<String>,
    /// Link or image title
    pub title: Option<String>,
    /// Image alt text
    pub alt: Option<String>,
    /// Code block language tag
    pub lang: Option<String>,
}

impl AstNode {
    /// Create a bare node of the given kind
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            value: None,
            raw: None,
            url: None,
            title: None,
            alt: None,
            lang: None,
        }
    }

    /// Create a document root with children
    pub fn document(children: Vec<AstNode>) -> Self {
        Self {
            children,
            ..Self::new(NodeKind::Document)
        }
    }

    /// Create a paragraph with children
    pub fn paragraph(children: Vec<AstNode>) -> Self {
        Self {
            children,
            ..Self::new(NodeKind::Paragraph)
        }
    }

    /// Create a plain text leaf
    pub fn text(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::new(NodeKind::Text)
        }
    }

    /// Create an emphasis (italic) node
    pub fn emphasis(children: Vec<AstNode>) -> Self {
        Self {
            children,
            ..Self::new(NodeKind::Emphasis)
        }
    }

    /// Create a strong (bold) node
    pub fn strong(children: Vec<AstNode>) -> Self {
        Self {
            children,
            ..Self::new(NodeKind::Strong)
        }
    }

    /// Create an inline code leaf
    pub fn code(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::new(NodeKind::Code)
        }
    }

    /// Create a code block leaf with an optional language tag
    pub fn code_block(value: &str, lang: Option<&str>) -> Self {
        Self {
            value: Some(value.to_string()),
            lang: lang.map(str::to_string),
            ..Self::new(NodeKind::CodeBlock)
        }
    }

    /// Create a link node
    pub fn link(children: Vec<AstNode>, url: &str, title: Option<&str>) -> Self {
        Self {
            children,
            url: Some(url.to_string()),
            title: title.map(str::to_string),
            ..Self::new(NodeKind::Link)
        }
    }

    /// Create an image node
    pub fn image(url: &str, alt: Option<&str>, title: Option<&str>) -> Self {
        Self {
            url: Some(url.to_string()),
            alt: alt.map(str::to_string),
            title: title.map(str::to_string),
            ..Self::new(NodeKind::Image)
        }
    }

    /// Create a list node carrying its verbatim source slice
    pub fn list(raw: &str) -> Self {
        Self {
            raw: Some(raw.to_string()),
            ..Self::new(NodeKind::List)
        }
    }

    /// Create a table node carrying its verbatim source slice
    pub fn table(raw: &str) -> Self {
        Self {
            raw: Some(raw.to_string()),
            ..Self::new(NodeKind::Table)
        }
    }

    /// Add a child node
    pub fn add_child(&mut self, child: AstNode) {
        self.children.push(child);
    }

    /// Iterate over child nodes
    pub fn children(&self) -> impl Iterator<Item = &AstNode> {
        self.children.iter()
    }

    /// Get all literal text from this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            child.collect_text(out);
        }
        if let Some(value) = &self.value {
            out.push_str(value);
        }
    }
}
