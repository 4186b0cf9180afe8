//! Symbol stream with bounded push-back.

use hbs_tokenizer::{Symbol, Tokenizer};

/// Number of symbols that can be pushed back at once.
pub const PUSH_BACK_CAPACITY: usize = 2;

/// Wraps the tokenizer with one symbol of lookahead and a small push-back
/// buffer.
///
/// Pushed-back symbols are handed out again, most recent first, before
/// anything is pulled from the tokenizer.
#[derive(Clone)]
pub struct SymbolStream<'src> {
    tokenizer: Tokenizer<'src>,
    /// Symbol peeked from the tokenizer but not yet advanced past.
    lookahead: Option<Symbol<'src>>,
    /// Symbols given back by the caller. Never longer than
    /// [`PUSH_BACK_CAPACITY`]; needing more is a bug in the caller.
    pushed_back: Vec<Symbol<'src>>,
}

impl<'src> SymbolStream<'src> {
    /// Create a stream over the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            lookahead: None,
            pushed_back: Vec::with_capacity(PUSH_BACK_CAPACITY),
        }
    }

    /// The current symbol, without consuming it.
    pub fn peek(&mut self) -> Symbol<'src> {
        if let Some(symbol) = self.pushed_back.last() {
            return *symbol;
        }
        let tokenizer = &mut self.tokenizer;
        *self.lookahead.get_or_insert_with(|| tokenizer.next_token())
    }

    /// Consume and return the current symbol.
    pub fn advance(&mut self) -> Symbol<'src> {
        if let Some(symbol) = self.pushed_back.pop() {
            return symbol;
        }
        self.lookahead
            .take()
            .unwrap_or_else(|| self.tokenizer.next_token())
    }

    /// Give back a symbol so the next [`advance`](Self::advance) returns it.
    ///
    /// # Panics
    ///
    /// If the buffer already holds [`PUSH_BACK_CAPACITY`] symbols.
    pub fn push_back(&mut self, symbol: Symbol<'src>) {
        assert!(
            self.pushed_back.len() < PUSH_BACK_CAPACITY,
            "push-back buffer overflow - this is a bug"
        );
        self.pushed_back.push(symbol);
    }

    /// Number of symbols currently pushed back.
    pub fn pushed_back(&self) -> usize {
        self.pushed_back.len()
    }

    /// Whether the current symbol is the end of input.
    pub fn at_eof(&mut self) -> bool {
        self.peek().is_eof()
    }
}
