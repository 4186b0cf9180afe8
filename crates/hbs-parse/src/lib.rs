#![doc = include_str!("../README.md")]

pub use hbs_tokenizer::{Location, Symbol, SymbolKind, Tokenizer};
pub use hbs_tree::{Block, BlockKind, Node, Span, SpanKind};

mod context;
pub use context::ParseContext;

mod diagnostic;
pub use diagnostic::{Diagnostic, DiagnosticKind, ParseError};

mod options;
pub use options::ParseOptions;

mod parser;
pub use parser::{Parse, Parser};

mod stream;
pub use stream::{PUSH_BACK_CAPACITY, SymbolStream};

/// Parse a template with default options.
///
/// Locations are `u32` byte offsets, so templates must be smaller than
/// 4 GiB.
pub fn parse(source: &str) -> Result<Parse, ParseError> {
    Parser::new(source).parse()
}
