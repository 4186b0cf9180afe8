//! Leaf nodes.

use hbs_tokenizer::Location;

/// What the text held by a [`Span`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// Literal template text.
    Text,
    /// Tag syntax: delimiters, `#`, `/`, `!` and `~` markers.
    MetaCode,
    /// A tag name or expression path.
    Expression,
    /// Whitespace between the parts of a tag.
    WhiteSpace,
    /// A positional argument.
    Parameter,
    /// A `key=value` argument.
    Map,
    /// The body of a comment tag.
    Comment,
}

/// A leaf holding verbatim source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// What the text is.
    pub kind: SpanKind,
    /// The raw text of every symbol the span absorbed.
    pub content: String,
    /// Where the content sits in the source.
    pub location: Location,
}

impl Span {
    /// Create a new span.
    pub fn new(kind: SpanKind, content: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            content: content.into(),
            location,
        }
    }

    /// Whether the span holds no text.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
