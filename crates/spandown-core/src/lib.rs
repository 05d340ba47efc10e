//! spandown-core - entity data model and offset utilities
//!
//! This crate provides the shared vocabulary of the two spandown
//! conversion pipelines: the markdown AST consumed by the forward
//! direction, the positional style entities both directions speak, and
//! the UTF-16 offset arithmetic that keeps them aligned.
//!
//! # Architecture
//!
//! ```text
//! Markdown AST ──annotate──▶ ┌───────────────────┐
//!                            │ text + entities   │ ──render──▶ HTML
//! Platform message ─────────▶│ (UTF-16 offsets)  │
//!                            └───────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use spandown_core::{MessageLike, StyleEntity};
//!
//! let msg = MessageLike::from_text(
//!     "hello world",
//!     vec![StyleEntity::bold(0, 5)],
//! );
//! assert_eq!(msg.content(), Some("hello world"));
//! assert_eq!(msg.style_entities()[0].end(), 5);
//! ```

mod ast;
mod entity;
mod offset;

pub use ast::{AstNode, NodeKind};
pub use entity::{EntityKind, FormattedMessage, MessageLike, ParseMode, StyleEntity};
pub use offset::{rebase, shift, utf16_len, Expansion};
