//! Convert a markdown AST into flat text plus positional style entities.
//!
//! This is the forward pipeline: a single depth-first pass that
//! concatenates child text left-to-right, shifting each child's spans by
//! the running UTF-16 length of everything emitted before it. Node kinds
//! outside the mapping table contribute their text but no styling.

use spandown_core::{utf16_len, AstNode, FormattedMessage, NodeKind, StyleEntity};

use crate::service::SpandownOptions;

/// Per-call mutable state, never shared across conversions.
struct ParsingContext {
    depth: usize,
    image_counter: usize,
}

/// A node-kind-tagged span, before mapping to the entity vocabulary.
struct RawSpan {
    kind: NodeKind,
    offset: usize,
    length: usize,
    url: Option<String>,
    language: Option<String>,
}

/// Text and spans produced for one subtree. Span offsets are relative
/// to the subtree's own text.
struct NodeOutput {
    text: String,
    spans: Vec<RawSpan>,
}

/// Run the forward pipeline over a parsed document tree.
pub(crate) fn annotate(root: &AstNode, options: &SpandownOptions) -> FormattedMessage {
    let mut ctx = ParsingContext {
        depth: 0,
        image_counter: 0,
    };
    let out = walk(root, &mut ctx, options);
    let entities: Vec<StyleEntity> = out.spans.iter().filter_map(to_style).collect();

    let (text, entities) = trim_rebased(out.text, entities);
    FormattedMessage {
        text,
        parse_mode: None,
        entities,
    }
}

fn walk(node: &AstNode, ctx: &mut ParsingContext, options: &SpandownOptions) -> NodeOutput {
    match node.kind {
        // Lists keep their original markdown source; no native list
        // styling exists on the target side.
        NodeKind::List if node.raw.is_some() => {
            let raw = node.raw.as_deref().unwrap_or_default();
            NodeOutput {
                text: format!("{raw}\n\n"),
                spans: Vec::new(),
            }
        }
        // Tables keep their source too, wrapped in a preformatted span
        // so the columns stay aligned.
        NodeKind::Table if node.raw.is_some() => {
            let raw = node.raw.as_deref().unwrap_or_default();
            let length = utf16_len(raw);
            NodeOutput {
                text: format!("{raw}\n\n"),
                spans: vec![RawSpan {
                    kind: NodeKind::CodeBlock,
                    offset: 0,
                    length,
                    url: None,
                    language: None,
                }],
            }
        }
        NodeKind::Image => image_placeholder(node, ctx, options),
        _ => walk_children(node, ctx, options),
    }
}

/// Images are replaced by a numbered caption that links to the image.
/// The counter is scoped to the whole conversion call, so sibling
/// images number 1, 2, ….
fn image_placeholder(
    node: &AstNode,
    ctx: &mut ParsingContext,
    options: &SpandownOptions,
) -> NodeOutput {
    ctx.image_counter += 1;
    let caption = node
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .or(node.alt.as_deref().filter(|a| !a.is_empty()));

    let mut text = format!("{} {}", options.image_caption_prefix, ctx.image_counter);
    if let Some(caption) = caption {
        text.push_str(" - ");
        text.push_str(caption);
    }

    let length = utf16_len(&text);
    NodeOutput {
        spans: vec![
            RawSpan {
                kind: NodeKind::Link,
                offset: 0,
                length,
                url: node.url.clone(),
                language: None,
            },
            RawSpan {
                kind: NodeKind::Strong,
                offset: 0,
                length,
                url: None,
                language: None,
            },
        ],
        text,
    }
}

fn walk_children(node: &AstNode, ctx: &mut ParsingContext, options: &SpandownOptions) -> NodeOutput {
    let mut text = String::new();
    let mut spans: Vec<RawSpan> = Vec::new();
    let mut offset = 0;

    for child in node.children() {
        ctx.depth += 1;
        let child_out = walk(child, ctx, options);
        ctx.depth -= 1;

        // Shift the child's spans by everything emitted before it.
        spans.extend(child_out.spans.into_iter().map(|mut span| {
            span.offset += offset;
            span
        }));
        offset += utf16_len(&child_out.text);
        text.push_str(&child_out.text);
    }

    if let Some(value) = &node.value {
        text.push_str(value);
    }

    // Block-level separators. The code block's own span must not cover
    // the separator it appends.
    let mut length_correction = 0;
    match node.kind {
        NodeKind::Paragraph => text.push_str("\n\n"),
        NodeKind::CodeBlock => {
            text.push_str("\n\n");
            length_correction = 2;
        }
        _ => {}
    }

    let own = RawSpan {
        kind: node.kind,
        offset: 0,
        length: utf16_len(&text) - length_correction,
        url: node.url.clone(),
        language: node.lang.clone(),
    };

    let mut all = Vec::with_capacity(spans.len() + 1);
    all.push(own);
    all.extend(spans);
    NodeOutput { text, spans: all }
}

/// Map a node-kind span to a target style entity. Kinds without a
/// target mapping are structure-only and produce nothing.
fn to_style(span: &RawSpan) -> Option<StyleEntity> {
    let entity = match span.kind {
        NodeKind::Emphasis => StyleEntity::italic(span.offset, span.length),
        NodeKind::Strong => StyleEntity::bold(span.offset, span.length),
        NodeKind::Link => StyleEntity::text_link(
            span.offset,
            span.length,
            span.url.as_deref().unwrap_or_default(),
        ),
        NodeKind::Code => StyleEntity::code(span.offset, span.length),
        NodeKind::CodeBlock => StyleEntity::pre(span.offset, span.length, span.language.as_deref()),
        _ => return None,
    };
    Some(entity)
}

/// Trim surrounding whitespace and keep the entities valid against the
/// trimmed text: offsets shift down by the removed leading code units
/// and spans are clamped to the new length.
fn trim_rebased(text: String, entities: Vec<StyleEntity>) -> (String, Vec<StyleEntity>) {
    let trimmed_start = text.trim_start();
    let leading = utf16_len(&text) - utf16_len(trimmed_start);
    let trimmed = trimmed_start.trim_end().to_string();
    let limit = utf16_len(&trimmed);

    let entities = entities
        .into_iter()
        .map(|mut entity| {
            let start = entity.offset.saturating_sub(leading).min(limit);
            let end = entity.end().saturating_sub(leading).clamp(start, limit);
            entity.offset = start;
            entity.length = end - start;
            entity
        })
        .collect();
    (trimmed, entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spandown_core::EntityKind;

    fn run(root: &AstNode) -> FormattedMessage {
        annotate(root, &SpandownOptions::default())
    }

    #[test]
    fn test_plain_paragraph() {
        let doc = AstNode::document(vec![AstNode::paragraph(vec![AstNode::text("Hello World")])]);
        let msg = run(&doc);
        assert_eq!(msg.text, "Hello World");
        assert!(msg.parse_mode.is_none());
        assert!(msg.entities.is_empty());
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        let doc = AstNode::document(vec![
            AstNode::paragraph(vec![AstNode::text("one")]),
            AstNode::paragraph(vec![AstNode::text("two")]),
        ]);
        assert_eq!(run(&doc).text, "one\n\ntwo");
    }

    #[test]
    fn test_bold_and_italic_offsets() {
        let doc = AstNode::document(vec![AstNode::paragraph(vec![
            AstNode::text("a "),
            AstNode::strong(vec![AstNode::text("bold")]),
            AstNode::text(" and "),
            AstNode::emphasis(vec![AstNode::text("italic")]),
        ])]);
        let msg = run(&doc);
        assert_eq!(msg.text, "a bold and italic");
        assert_eq!(
            msg.entities,
            vec![StyleEntity::bold(2, 4), StyleEntity::italic(11, 6)]
        );
    }

    #[test]
    fn test_nested_styles_share_span() {
        let doc = AstNode::document(vec![AstNode::paragraph(vec![AstNode::strong(vec![
            AstNode::emphasis(vec![AstNode::text("both")]),
        ])])]);
        let msg = run(&doc);
        assert_eq!(msg.text, "both");
        // parent span is pushed before the shifted child spans
        assert_eq!(
            msg.entities,
            vec![StyleEntity::bold(0, 4), StyleEntity::italic(0, 4)]
        );
    }

    #[test]
    fn test_link_carries_url() {
        let doc = AstNode::document(vec![AstNode::paragraph(vec![
            AstNode::text("see "),
            AstNode::link(vec![AstNode::text("docs")], "https://example.com", None),
        ])]);
        let msg = run(&doc);
        assert_eq!(msg.text, "see docs");
        assert_eq!(
            msg.entities,
            vec![StyleEntity::text_link(4, 4, "https://example.com")]
        );
    }

    #[test]
    fn test_code_block_span_excludes_separator() {
        let doc = AstNode::document(vec![
            AstNode::code_block("let x = 1;", Some("rust")),
            AstNode::paragraph(vec![AstNode::text("after")]),
        ]);
        let msg = run(&doc);
        assert_eq!(msg.text, "let x = 1;\n\nafter");
        assert_eq!(
            msg.entities,
            vec![StyleEntity::pre(0, 10, Some("rust"))]
        );
    }

    #[test]
    fn test_trailing_code_block_clamps_to_trim() {
        let doc = AstNode::document(vec![AstNode::code_block("tail", None)]);
        let msg = run(&doc);
        assert_eq!(msg.text, "tail");
        assert_eq!(msg.entities, vec![StyleEntity::pre(0, 4, None)]);
    }

    #[test]
    fn test_list_raw_passthrough() {
        let doc = AstNode::document(vec![
            AstNode::list("- one\n- two"),
            AstNode::paragraph(vec![AstNode::text("after")]),
        ]);
        let msg = run(&doc);
        assert_eq!(msg.text, "- one\n- two\n\nafter");
        assert!(msg.entities.is_empty());
    }

    #[test]
    fn test_table_raw_preformatted() {
        let doc = AstNode::document(vec![AstNode::table("| a | b |\n| 1 | 2 |")]);
        let msg = run(&doc);
        assert_eq!(msg.text, "| a | b |\n| 1 | 2 |");
        assert_eq!(msg.entities, vec![StyleEntity::pre(0, 19, None)]);
    }

    #[test]
    fn test_image_placeholder_link_and_bold() {
        let doc = AstNode::document(vec![AstNode::paragraph(vec![AstNode::image(
            "https://example.com/cat.png",
            Some("a cat"),
            None,
        )])]);
        let msg = run(&doc);
        assert_eq!(msg.text, "🖼️Pic. 1 - a cat");
        // both entities span the whole placeholder
        let length = utf16_len(&msg.text);
        assert_eq!(
            msg.entities,
            vec![
                StyleEntity::text_link(0, length, "https://example.com/cat.png"),
                StyleEntity::bold(0, length),
            ]
        );
    }

    #[test]
    fn test_image_title_preferred_over_alt() {
        let doc = AstNode::document(vec![AstNode::paragraph(vec![AstNode::image(
            "u", Some("alt"), Some("title"),
        )])]);
        assert_eq!(run(&doc).text, "🖼️Pic. 1 - title");
    }

    #[test]
    fn test_image_counter_shared_across_siblings() {
        let doc = AstNode::document(vec![
            AstNode::paragraph(vec![AstNode::image("a.png", None, None)]),
            AstNode::paragraph(vec![AstNode::image("b.png", None, None)]),
        ]);
        let msg = run(&doc);
        assert_eq!(msg.text, "🖼️Pic. 1\n\n🖼️Pic. 2");
    }

    #[test]
    fn test_image_children_not_descended() {
        let mut image = AstNode::image("u", None, None);
        image.add_child(AstNode::text("inner alt text"));
        let doc = AstNode::document(vec![AstNode::paragraph(vec![image])]);
        assert_eq!(run(&doc).text, "🖼️Pic. 1");
    }

    #[test]
    fn test_unknown_kind_is_structure_only() {
        let mut heading = AstNode::new(NodeKind::Heading);
        heading.add_child(AstNode::strong(vec![AstNode::text("Title")]));
        let doc = AstNode::document(vec![heading]);
        let msg = run(&doc);
        assert_eq!(msg.text, "Title");
        // the heading itself contributes no entity, the nested bold does
        assert_eq!(msg.entities, vec![StyleEntity::bold(0, 5)]);
    }

    #[test]
    fn test_entities_valid_after_trim() {
        let doc = AstNode::document(vec![AstNode::paragraph(vec![
            AstNode::text("  "),
            AstNode::strong(vec![AstNode::text("x")]),
        ])]);
        let msg = run(&doc);
        assert_eq!(msg.text, "x");
        assert_eq!(msg.entities, vec![StyleEntity::bold(0, 1)]);
        for entity in &msg.entities {
            assert!(entity.end() <= utf16_len(&msg.text));
        }
    }

    #[test]
    fn test_offsets_counted_in_utf16_units() {
        let doc = AstNode::document(vec![AstNode::paragraph(vec![
            AstNode::text("🤔 "),
            AstNode::emphasis(vec![AstNode::text("hm")]),
        ])]);
        let msg = run(&doc);
        // the emoji occupies two code units, the space one
        assert_eq!(
            msg.entities,
            vec![StyleEntity::new(EntityKind::Italic, 3, 2)]
        );
    }
}
