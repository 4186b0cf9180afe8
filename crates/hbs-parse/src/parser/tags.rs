//! Tag body parsers.

use hbs_tokenizer::{Location, SymbolKind};
use hbs_tree::{BlockKind, Node, SpanKind};
use tracing::debug;

use super::{Parser, PendingSpan, RunScanner};
use crate::{DiagnosticKind, ParseError};

impl<'src> Parser<'src> {
    /// `{{#name params}}`, opening a block that stays current until its
    /// close tag.
    ///
    /// An `elseif` under a branch block is folded into that block instead of
    /// opening a new one.
    pub(super) fn parse_block_open(&mut self) -> Result<(), ParseError> {
        let parent = self.context.current_name();

        self.context.start_block(BlockKind::Tag)?;
        let name = self.scoped(BlockKind::TagElement, |p| {
            let opened = p.open_tag()?;
            p.bump_if(SymbolKind::Hash, SpanKind::MetaCode)?;
            let name = p.consume_run(SpanKind::Expression)?;
            p.parse_parameters()?;
            p.close_tag(opened)?;
            Ok(name)
        })?;

        if name == "elseif" && self.options.is_branch_block(&parent) {
            debug!(%parent, "merge elseif");
            self.context.merge_current_with_parent()?;
        } else {
            self.context.current_block()?.name = name;
        }
        Ok(())
    }

    /// `{{/name}}`, closing the current block.
    pub(super) fn parse_block_close(&mut self) -> Result<(), ParseError> {
        let expected = self.context.current_name();
        let at_root = self.context.is_at_root();
        let opened_at = self
            .context
            .current_block()?
            .children
            .first()
            .and_then(Node::location);

        self.scoped(BlockKind::TagElement, move |p| {
            let opened = p.open_tag()?;
            p.bump_if(SymbolKind::Slash, SpanKind::MetaCode)?;

            let start = p.stream.peek().location.start;
            let actual = p.consume_run(SpanKind::Expression)?;
            let location = run_location(start, &actual);
            if at_root {
                p.context
                    .on_error(location, DiagnosticKind::UnexpectedCloseTag { name: actual });
            } else if actual != expected {
                p.context.on_error(
                    location,
                    DiagnosticKind::UnbalancedTag {
                        expected,
                        actual,
                        opened_at,
                    },
                );
            }

            p.parse_parameters()?;
            p.close_tag(opened)
        })?;

        // A stray close has nothing to pop
        if !at_root {
            self.context.end_block()?;
        }
        Ok(())
    }

    /// `{{name params}}` and `{{{name}}}`.
    ///
    /// Under a branch block, `{{else}}` becomes branch markup and
    /// `{{elseif ...}}` is folded into the branch block.
    pub(super) fn parse_expression(&mut self) -> Result<(), ParseError> {
        let parent = self.context.current_name();
        let branch = self.options.is_branch_block(&parent);

        self.scoped(BlockKind::Expression, |p| {
            let opened = p.open_tag()?;
            let name = p.consume_run(SpanKind::Expression)?;

            if branch && name == "else" {
                debug!(%parent, "else becomes tag element");
                p.context.current_block()?.kind = BlockKind::TagElement;
            }
            let merge = branch && name == "elseif";
            p.context.current_block()?.name = name;

            p.parse_parameters()?;
            p.close_tag(opened)?;

            if merge {
                debug!(%parent, "merge elseif");
                p.context.merge_current_with_parent()?;
            }
            Ok(())
        })
    }

    /// `{{! body }}` and `{{!-- body --}}`.
    ///
    /// Comments are not markup of the enclosing block: their spans go
    /// straight into the current block, with the body as one
    /// [`SpanKind::Comment`] span.
    pub(super) fn parse_comment(&mut self) -> Result<(), ParseError> {
        let opened = self.open_tag()?;
        self.bump_if(SymbolKind::Bang, SpanKind::MetaCode)?;
        self.consume_until(SpanKind::Comment, |s| s.kind != SymbolKind::Comment)?;
        self.close_tag(opened)
    }

    /// Opening delimiter and optional `~`. Returns the delimiter kind.
    fn open_tag(&mut self) -> Result<SymbolKind, ParseError> {
        let opened = self.bump(SpanKind::MetaCode)?.kind;
        self.bump_if(SymbolKind::Tilde, SpanKind::MetaCode)?;
        Ok(opened)
    }

    /// Arguments after a tag name, up to `~` or the end of the tag.
    fn parse_parameters(&mut self) -> Result<(), ParseError> {
        loop {
            self.consume_until(SpanKind::WhiteSpace, |s| s.kind != SymbolKind::Whitespace)?;
            let kind = self.stream.peek().kind;
            match kind {
                SymbolKind::Eof | SymbolKind::Tilde => return Ok(()),
                k if k.is_open_delimiter() || k.is_close_delimiter() => return Ok(()),
                SymbolKind::Identifier | SymbolKind::Keyword => self.parse_argument()?,
                _ => {
                    self.consume_run(SpanKind::Parameter)?;
                }
            }
        }
    }

    /// `name`, `key=value` or a longer run starting with an identifier.
    fn parse_argument(&mut self) -> Result<(), ParseError> {
        let mut pending = PendingSpan::new(SpanKind::Parameter);
        pending.push(&self.stream.advance());
        if self.stream.peek().kind == SymbolKind::Assign {
            pending.kind = SpanKind::Map;
            pending.push(&self.stream.advance());
        }

        let mut scanner = RunScanner::default();
        self.extend_until(&mut pending, |s| scanner.stops_at(s));
        self.emit(pending)
    }

    /// Optional `~` and the closing delimiter.
    ///
    /// Stray content after a `~` is reported once and parsed as arguments.
    fn close_tag(&mut self, opened: SymbolKind) -> Result<(), ParseError> {
        let mut reported = false;
        loop {
            self.bump_if(SymbolKind::Tilde, SpanKind::MetaCode)?;
            let symbol = self.stream.peek();

            if symbol.kind.is_close_delimiter() {
                let raw_open = opened == SymbolKind::RawOpenDelimiter;
                let raw_close = symbol.kind == SymbolKind::RawCloseDelimiter;
                if raw_open != raw_close {
                    self.context
                        .on_error(symbol.location, DiagnosticKind::MismatchedDelimiter);
                }
                self.bump(SpanKind::MetaCode)?;
                return Ok(());
            }

            if symbol.is_eof() || symbol.kind.is_open_delimiter() {
                self.context
                    .on_error(symbol.location, DiagnosticKind::UnclosedTag);
                return Ok(());
            }

            if !reported {
                self.context
                    .on_error(symbol.location, DiagnosticKind::UnexpectedSymbol);
                reported = true;
            }
            self.parse_parameters()?;
        }
    }
}

/// Location of a run of `text` starting at byte `start`, clamped to the
/// largest offset a [`Location`] can hold.
fn run_location(start: u32, text: &str) -> Location {
    let len = u32::try_from(text.len()).unwrap_or(u32::MAX);
    Location::new(start, start.saturating_add(len))
}
