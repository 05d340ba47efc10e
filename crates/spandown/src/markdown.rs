//! Markdown parsing support.
//!
//! This module adapts `comrak`'s arena AST to the parser-agnostic
//! [`AstNode`] structure consumed by the forward pipeline. Any other
//! markdown parser can be plugged in the same way through
//! [`SpandownService::markdown_to_message_with`](crate::SpandownService::markdown_to_message_with).

use comrak::nodes::{AstNode as ComrakNode, NodeValue, Sourcepos};
use comrak::{parse_document, Arena, Options};
use spandown_core::{AstNode, NodeKind};

use crate::Result;

/// Parse a markdown string into an [`AstNode`] tree.
///
/// Tables are enabled so tabular sources survive as verbatim `raw`
/// slices; every comrak construct outside the engine's taxonomy maps to
/// a structure-only kind.
///
/// # Example
///
/// ```rust
/// use spandown::{parse_markdown, SpandownService};
///
/// let root = parse_markdown("Hello **world**").unwrap();
/// let msg = SpandownService::new().annotate(&root);
/// assert_eq!(msg.text, "Hello world");
/// ```
pub fn parse_markdown(markdown: &str) -> Result<AstNode> {
    let arena = Arena::new();
    let mut options = Options::default();
    options.extension.table = true;

    let root = parse_document(&arena, markdown, &options);
    let lines = line_offsets(markdown);
    Ok(convert(root, markdown, &lines))
}

fn convert<'a>(node: &'a ComrakNode<'a>, source: &str, lines: &[usize]) -> AstNode {
    let data = node.data.borrow();

    match &data.value {
        NodeValue::Document => with_children(NodeKind::Document, node, source, lines),
        NodeValue::Paragraph => with_children(NodeKind::Paragraph, node, source, lines),
        NodeValue::Text(text) => AstNode::text(text),
        NodeValue::Emph => with_children(NodeKind::Emphasis, node, source, lines),
        NodeValue::Strong => with_children(NodeKind::Strong, node, source, lines),
        NodeValue::Code(code) => AstNode::code(&code.literal),
        NodeValue::CodeBlock(block) => {
            let literal = block.literal.strip_suffix('\n').unwrap_or(&block.literal);
            let lang = block.info.split_whitespace().next().filter(|s| !s.is_empty());
            AstNode::code_block(literal, lang)
        }
        NodeValue::Link(link) => {
            let mut out = with_children(NodeKind::Link, node, source, lines);
            out.url = Some(link.url.clone());
            out.title = non_empty(&link.title);
            out
        }
        NodeValue::Image(link) => {
            // comrak puts the alt text in the image's children
            let alt: String = node
                .children()
                .map(|child| convert(child, source, lines).text_content())
                .collect();
            AstNode::image(&link.url, non_empty(&alt).as_deref(), non_empty(&link.title).as_deref())
        }
        NodeValue::List(..) => {
            let mut out = with_children(NodeKind::List, node, source, lines);
            out.raw = raw_slice(source, lines, data.sourcepos);
            out
        }
        NodeValue::Table(..) => {
            let mut out = with_children(NodeKind::Table, node, source, lines);
            out.raw = raw_slice(source, lines, data.sourcepos);
            out
        }
        NodeValue::Heading(..) => with_children(NodeKind::Heading, node, source, lines),
        NodeValue::BlockQuote => with_children(NodeKind::BlockQuote, node, source, lines),
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            let mut out = AstNode::new(NodeKind::Break);
            out.value = Some("\n".to_string());
            out
        }
        NodeValue::HtmlBlock(html) => {
            let mut out = AstNode::new(NodeKind::Html);
            out.value = Some(html.literal.clone());
            out
        }
        NodeValue::HtmlInline(html) => {
            let mut out = AstNode::new(NodeKind::Html);
            out.value = Some(html.clone());
            out
        }
        NodeValue::ThematicBreak => AstNode::new(NodeKind::ThematicBreak),
        _ => with_children(NodeKind::Other, node, source, lines),
    }
}

fn with_children<'a>(
    kind: NodeKind,
    node: &'a ComrakNode<'a>,
    source: &str,
    lines: &[usize],
) -> AstNode {
    let mut out = AstNode::new(kind);
    for child in node.children() {
        out.add_child(convert(child, source, lines));
    }
    out
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Byte offsets of each line start.
fn line_offsets(source: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(source.match_indices('\n').map(|(index, _)| index + 1))
        .collect()
}

/// Recover the verbatim source slice for a node from its source
/// position (1-based lines, inclusive end column).
fn raw_slice(source: &str, lines: &[usize], sourcepos: Sourcepos) -> Option<String> {
    let start_line = lines.get(sourcepos.start.line.checked_sub(1)?)?;
    let end_line = lines.get(sourcepos.end.line.checked_sub(1)?)?;

    let start = clamp_boundary(source, start_line + sourcepos.start.column.saturating_sub(1));
    let end = clamp_boundary(source, end_line + sourcepos.end.column);
    if start >= end {
        return None;
    }
    Some(source[start..end].to_string())
}

fn clamp_boundary(source: &str, index: usize) -> usize {
    let mut index = index.min(source.len());
    while index > 0 && !source.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpandownService;
    use spandown_core::StyleEntity;

    fn to_message(markdown: &str) -> spandown_core::FormattedMessage {
        SpandownService::new().markdown_to_message(markdown)
    }

    #[test]
    fn test_parse_tree_shape() {
        let root = parse_markdown("Hello **world**").unwrap();
        assert_eq!(root.kind, NodeKind::Document);
        assert_eq!(root.children[0].kind, NodeKind::Paragraph);
        let para = &root.children[0];
        assert_eq!(para.children[0].kind, NodeKind::Text);
        assert_eq!(para.children[1].kind, NodeKind::Strong);
    }

    #[test]
    fn test_emphasis_and_strong() {
        let msg = to_message("some *italic* and **bold** text");
        assert_eq!(msg.text, "some italic and bold text");
        assert_eq!(
            msg.entities,
            vec![StyleEntity::italic(5, 6), StyleEntity::bold(16, 4)]
        );
    }

    #[test]
    fn test_inline_code() {
        let msg = to_message("use `foo()` here");
        assert_eq!(msg.text, "use foo() here");
        assert_eq!(msg.entities, vec![StyleEntity::code(4, 5)]);
    }

    #[test]
    fn test_fenced_code_block_language() {
        let msg = to_message("```rust\nlet x = 1;\n```");
        assert_eq!(msg.text, "let x = 1;");
        assert_eq!(msg.entities, vec![StyleEntity::pre(0, 10, Some("rust"))]);
    }

    #[test]
    fn test_link() {
        let msg = to_message("see [docs](https://example.com)");
        assert_eq!(msg.text, "see docs");
        assert_eq!(
            msg.entities,
            vec![StyleEntity::text_link(4, 4, "https://example.com")]
        );
    }

    #[test]
    fn test_image_placeholder() {
        let msg = to_message("![a cat](https://example.com/cat.png)");
        assert_eq!(msg.text, "🖼️Pic. 1 - a cat");
        assert_eq!(msg.entities.len(), 2);
        assert_eq!(
            msg.entities[0].url.as_deref(),
            Some("https://example.com/cat.png")
        );
    }

    #[test]
    fn test_list_raw_survives() {
        let msg = to_message("intro\n\n- one\n- two");
        assert_eq!(msg.text, "intro\n\n- one\n- two");
        assert!(msg.entities.is_empty());
    }

    #[test]
    fn test_table_raw_preformatted() {
        let markdown = "| a | b |\n| - | - |\n| 1 | 2 |";
        let msg = to_message(markdown);
        assert_eq!(msg.text, markdown);
        assert_eq!(msg.entities.len(), 1);
        assert_eq!(msg.entities[0].kind, spandown_core::EntityKind::Pre);
    }

    #[test]
    fn test_soft_break_becomes_newline() {
        let msg = to_message("line one\nline two");
        assert_eq!(msg.text, "line one\nline two");
    }

    #[test]
    fn test_multiple_paragraphs() {
        let msg = to_message("first\n\nsecond");
        assert_eq!(msg.text, "first\n\nsecond");
    }
}
