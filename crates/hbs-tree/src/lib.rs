#![doc = include_str!("../README.md")]
//! Syntax tree for Handlebars-style templates.
//!
//! A parsed template is a single [`Block`] of kind [`BlockKind::Text`].
//! Each tag pair becomes a [`BlockKind::Tag`] block whose first and last
//! children are [`BlockKind::TagElement`] blocks holding the opening and
//! closing markup, with the body in between. Standalone `{{expr}}` tags
//! are [`BlockKind::Expression`] blocks. Everything else is a [`Span`].

mod block;
mod span;

pub use block::{Block, BlockKind, Descendants, Node};
pub use hbs_tokenizer::Location;
pub use span::{Span, SpanKind};
