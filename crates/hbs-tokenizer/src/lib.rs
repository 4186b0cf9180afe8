//! A tokenizer for Handlebars-style templates

mod location;
pub use location::Location;

mod symbol;
pub use symbol::{KEYWORDS, Symbol, SymbolKind};

mod tokenizer;
pub use tokenizer::Tokenizer;
