//! Tag parser.

use hbs_tokenizer::{Location, Symbol, SymbolKind};
use hbs_tree::{Block, BlockKind, Span, SpanKind};

use crate::{Diagnostic, ParseContext, ParseError, ParseOptions, SymbolStream};

mod dispatch;
mod tags;


/// The result of parsing a template.
#[derive(Debug, Clone)]
pub struct Parse {
    /// The root [`BlockKind::Text`] block.
    pub root: Block,
    /// Recoverable problems, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    /// Whether the template parsed without diagnostics.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Render every diagnostic with ariadne, one report after another.
    pub fn render_diagnostics(&self, filename: &str, source: &str) -> String {
        self.diagnostics
            .iter()
            .map(|d| d.render(filename, source))
            .collect()
    }
}

/// Builds a [`Block`] tree from template source.
#[derive(Clone)]
pub struct Parser<'src> {
    stream: SymbolStream<'src>,
    context: ParseContext,
    options: ParseOptions,
}

impl<'src> Parser<'src> {
    /// Create a parser with default options.
    pub fn new(source: &'src str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    /// Create a parser with the given options.
    pub fn with_options(source: &'src str, options: ParseOptions) -> Self {
        Self {
            stream: SymbolStream::new(source),
            context: ParseContext::new(),
            options,
        }
    }

    /// Parse the whole template.
    pub fn parse(mut self) -> Result<Parse, ParseError> {
        self.begin()?;
        self.parse_block_content()?;
        self.finish()
    }

    /// Open the root block. Must be called once before
    /// [`parse_block_content`](Self::parse_block_content).
    pub fn begin(&mut self) -> Result<(), ParseError> {
        self.context.begin()
    }

    /// Parse text and tags into the current block until the input runs out.
    ///
    /// Block bodies are parsed by this same loop: opening a block makes it
    /// the current block and closing it makes its parent current again, so
    /// nesting depth is bounded by the block stack rather than the call
    /// stack.
    pub fn parse_block_content(&mut self) -> Result<(), ParseError> {
        self.context.current_block()?;
        loop {
            self.consume_until(SpanKind::Text, |s| s.kind.is_open_delimiter())?;
            if self.stream.at_eof() {
                return Ok(());
            }
            self.parse_tag()?;
        }
    }

    /// Close all open blocks and return the tree.
    pub fn finish(self) -> Result<Parse, ParseError> {
        let (root, diagnostics) = self.context.finish(self.options.report_unclosed)?;
        Ok(Parse { root, diagnostics })
    }

    /// Run `f` inside a new child block of `kind`.
    ///
    /// The block is closed and attached to its parent whether `f` succeeds
    /// or not. If `f` merged the block away, nothing is left to close.
    fn scoped<T>(
        &mut self,
        kind: BlockKind,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let index = self.context.start_block(kind)?;
        let result = f(self);
        let released = self.context.release(index);
        let value = result?;
        released?;
        Ok(value)
    }

    /// Consume one symbol as a span of `kind`.
    fn bump(&mut self, kind: SpanKind) -> Result<Symbol<'src>, ParseError> {
        let symbol = self.stream.advance();
        if !symbol.text.is_empty() {
            self.context
                .push_span(Span::new(kind, symbol.text, symbol.location))?;
        }
        Ok(symbol)
    }

    /// Consume the current symbol as a span of `span_kind` if it is a
    /// `symbol_kind`.
    fn bump_if(&mut self, symbol_kind: SymbolKind, span_kind: SpanKind) -> Result<bool, ParseError> {
        if self.stream.peek().kind == symbol_kind {
            self.bump(span_kind)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume symbols into `pending` until `stop` holds or input ends.
    fn extend_until(
        &mut self,
        pending: &mut PendingSpan,
        mut stop: impl FnMut(&Symbol<'src>) -> bool,
    ) {
        loop {
            let symbol = self.stream.peek();
            if symbol.is_eof() || stop(&symbol) {
                break;
            }
            pending.push(&self.stream.advance());
        }
    }

    fn emit(&mut self, pending: PendingSpan) -> Result<(), ParseError> {
        if let Some(span) = pending.finish() {
            self.context.push_span(span)?;
        }
        Ok(())
    }

    /// Consume symbols until `stop` holds as one span of `kind`. Returns the
    /// consumed text, which may be empty; empty spans are not emitted.
    fn consume_until(
        &mut self,
        kind: SpanKind,
        stop: impl FnMut(&Symbol<'src>) -> bool,
    ) -> Result<String, ParseError> {
        let mut pending = PendingSpan::new(kind);
        self.extend_until(&mut pending, stop);
        let content = pending.content.clone();
        self.emit(pending)?;
        Ok(content)
    }

    /// Consume a name or argument run as one span of `kind`.
    fn consume_run(&mut self, kind: SpanKind) -> Result<String, ParseError> {
        let mut scanner = RunScanner::default();
        self.consume_until(kind, |s| scanner.stops_at(s))
    }
}

/// A span being assembled from consecutive symbols.
struct PendingSpan {
    kind: SpanKind,
    content: String,
    location: Option<Location>,
}

impl PendingSpan {
    fn new(kind: SpanKind) -> Self {
        Self {
            kind,
            content: String::new(),
            location: None,
        }
    }

    fn push(&mut self, symbol: &Symbol<'_>) {
        self.content.push_str(symbol.text);
        self.location = Some(match self.location {
            Some(location) => location.extend(symbol.location),
            None => symbol.location,
        });
    }

    fn finish(self) -> Option<Span> {
        let location = self.location?;
        if self.content.is_empty() {
            return None;
        }
        Some(Span::new(self.kind, self.content, location))
    }
}

/// Decides where a name or argument run ends.
///
/// A run ends at whitespace or `~`, except inside `( )`, `[ ]` or `| |`.
/// Delimiters end it regardless of nesting.
#[derive(Default)]
struct RunScanner {
    parens: usize,
    brackets: usize,
    in_pipes: bool,
}

impl RunScanner {
    fn stops_at(&mut self, symbol: &Symbol<'_>) -> bool {
        if symbol.kind.is_open_delimiter() || symbol.kind.is_close_delimiter() {
            return true;
        }
        let nested = self.parens > 0 || self.brackets > 0 || self.in_pipes;
        match symbol.kind {
            SymbolKind::Whitespace | SymbolKind::Tilde if !nested => return true,
            SymbolKind::LeftParen => self.parens += 1,
            SymbolKind::RightParen => self.parens = self.parens.saturating_sub(1),
            SymbolKind::LeftBracket => self.brackets += 1,
            SymbolKind::RightBracket => self.brackets = self.brackets.saturating_sub(1),
            SymbolKind::Pipe => self.in_pipes = !self.in_pipes,
            _ => {}
        }
        false
    }
}
