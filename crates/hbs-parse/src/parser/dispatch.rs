//! Tag classification.

use hbs_tokenizer::SymbolKind;
use tracing::trace;

use super::Parser;
use crate::ParseError;

/// The four kinds of tag sharing the `{{` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TagKind {
    /// `{{#name ...}}`
    BlockOpen,
    /// `{{/name}}`
    BlockClose,
    /// `{{! ... }}`
    Comment,
    /// `{{name ...}}`, `{{{name}}}`, `{{else}}`
    Expression,
}

impl TagKind {
    /// Classify by the first symbol after the delimiter and optional `~`.
    fn from_marker(marker: SymbolKind) -> Self {
        match marker {
            SymbolKind::Hash => TagKind::BlockOpen,
            SymbolKind::Slash => TagKind::BlockClose,
            SymbolKind::Bang => TagKind::Comment,
            _ => TagKind::Expression,
        }
    }
}

impl<'src> Parser<'src> {
    /// Parse the tag starting at the current opening delimiter.
    pub(super) fn parse_tag(&mut self) -> Result<(), ParseError> {
        match self.classify_tag() {
            TagKind::BlockOpen => self.parse_block_open(),
            TagKind::BlockClose => self.parse_block_close(),
            TagKind::Comment => self.parse_comment(),
            TagKind::Expression => self.parse_expression(),
        }
    }

    /// Look past the delimiter to find the tag kind, then push both symbols
    /// back so the tag parser starts at the delimiter.
    fn classify_tag(&mut self) -> TagKind {
        let delimiter = self.stream.advance();
        let next = self.stream.advance();
        let marker = if next.kind == SymbolKind::Tilde {
            self.stream.peek().kind
        } else {
            next.kind
        };
        self.stream.push_back(next);
        self.stream.push_back(delimiter);

        let kind = TagKind::from_marker(marker);
        trace!(?kind, at = delimiter.location.start, "dispatch tag");
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(source: &str) -> (TagKind, usize) {
        let mut parser = Parser::new(source);
        let kind = parser.classify_tag();
        (kind, parser.stream.pushed_back())
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("{{#if a}}"), (TagKind::BlockOpen, 2));
        assert_eq!(classify("{{/if}}"), (TagKind::BlockClose, 2));
        assert_eq!(classify("{{! hi }}"), (TagKind::Comment, 2));
        assert_eq!(classify("{{name}}"), (TagKind::Expression, 2));
        assert_eq!(classify("{{{name}}}"), (TagKind::Expression, 2));
        assert_eq!(classify("{{../up}}"), (TagKind::Expression, 2));
        assert_eq!(classify("{{"), (TagKind::Expression, 2));
    }

    #[test]
    fn test_classify_past_tilde() {
        assert_eq!(classify("{{~#if a}}").0, TagKind::BlockOpen);
        assert_eq!(classify("{{~/if}}").0, TagKind::BlockClose);
        assert_eq!(classify("{{~!x}}").0, TagKind::Comment);
        assert_eq!(classify("{{~x}}").0, TagKind::Expression);
    }

    #[test]
    fn test_symbols_are_pushed_back_in_order() {
        let mut parser = Parser::new("{{~#if}}");
        parser.classify_tag();
        assert_eq!(parser.stream.advance().kind, SymbolKind::OpenDelimiter);
        assert_eq!(parser.stream.advance().kind, SymbolKind::Tilde);
        assert_eq!(parser.stream.advance().kind, SymbolKind::Hash);
    }
}
