//! Symbol types produced by the tokenizer.

use crate::Location;

/// Identifiers the tokenizer reports as [`SymbolKind::Keyword`].
pub const KEYWORDS: &[&str] = &["true", "false", "null", "undefined", "else", "as"];

/// The kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    // Delimiters
    /// `{{`
    OpenDelimiter,
    /// `{{{`
    RawOpenDelimiter,
    /// `}}`
    CloseDelimiter,
    /// `}}}`
    RawCloseDelimiter,

    // Tag markers
    /// `#`
    Hash,
    /// `/`
    Slash,
    /// `!`
    Bang,
    /// `~` (whitespace control)
    Tilde,
    /// `=`
    Assign,

    // Tag content
    /// Spaces, tabs and newlines inside a tag
    Whitespace,
    /// Path or name: `foo`, `foo.bar`, `../x`, `@index`
    Identifier,
    /// One of [`KEYWORDS`]
    Keyword,
    /// `{`
    LeftBrace,
    /// `}` (not part of a closing delimiter)
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `|`
    Pipe,
    /// Quoted literal: `"a b"` or `'a b'`
    String,
    /// Numeric literal: `42`, `-1.5`
    Number,
    /// Body of a comment tag, after the `!`
    Comment,

    /// Literal template text outside of tags
    Text,
    /// Unterminated string literal
    Error,
    /// End of input
    Eof,
}

impl SymbolKind {
    /// Whether this symbol starts a tag.
    pub fn is_open_delimiter(&self) -> bool {
        matches!(
            self,
            SymbolKind::OpenDelimiter | SymbolKind::RawOpenDelimiter
        )
    }

    /// Whether this symbol ends a tag.
    pub fn is_close_delimiter(&self) -> bool {
        matches!(
            self,
            SymbolKind::CloseDelimiter | SymbolKind::RawCloseDelimiter
        )
    }
}

/// A symbol with its kind, location, and source text slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol<'src> {
    /// The kind of symbol.
    pub kind: SymbolKind,
    /// Where the symbol sits in the source.
    pub location: Location,
    /// The source text of this symbol.
    pub text: &'src str,
}

impl<'src> Symbol<'src> {
    /// Create a new symbol.
    pub fn new(kind: SymbolKind, location: Location, text: &'src str) -> Self {
        Self {
            kind,
            location,
            text,
        }
    }

    /// Whether this is the end-of-input marker.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == SymbolKind::Eof
    }
}
