//! Tokenizer for Handlebars-style templates.

use crate::{KEYWORDS, Location, Symbol, SymbolKind};
use tracing::trace;

/// A tokenizer that produces symbols from template source text.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// What kind of text we are scanning.
    mode: Mode,
}

/// Scanning mode, switched by delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Literal template text.
    Content,
    /// Inside `{{ ... }}` (or `{{{ ... }}}` when `raw`).
    Tag { raw: bool },
    /// Right after the `!` of a comment tag.
    CommentBody { raw: bool },
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    ///
    /// Byte offsets are `u32`, so the source must be smaller than 4 GiB.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            mode: Mode::Content,
        }
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Whether the tokenizer is currently between tag delimiters.
    #[inline]
    pub fn in_tag(&self) -> bool {
        self.mode != Mode::Content
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Advance by n bytes.
    #[inline]
    fn advance_by(&mut self, n: usize) {
        self.pos += n as u32;
        self.remaining = &self.remaining[n..];
    }

    /// Check if the remaining text starts with the given prefix.
    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Create a symbol from the given start position to current position.
    fn symbol(&self, kind: SymbolKind, start: u32) -> Symbol<'src> {
        let location = Location::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Symbol {:?} at {:?}: {:?}", kind, location, text);
        Symbol::new(kind, location, text)
    }

    /// Get the next symbol. Returns `Eof` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Symbol<'src> {
        if self.is_eof() {
            return self.symbol(SymbolKind::Eof, self.pos);
        }

        match self.mode {
            Mode::Content => self.tokenize_content(),
            Mode::Tag { raw } => self.tokenize_tag(raw),
            Mode::CommentBody { raw } => self.tokenize_comment_body(raw),
        }
    }

    /// Tokenize literal text up to the next opening delimiter.
    fn tokenize_content(&mut self) -> Symbol<'src> {
        if self.starts_with("{{") {
            return self.tokenize_open_delimiter();
        }

        let start = self.pos;
        while !self.is_eof() {
            // `\{{` is an escaped delimiter and stays literal
            if self.starts_with("\\{{") {
                self.advance_by(3);
                continue;
            }
            if self.starts_with("{{") {
                break;
            }
            self.advance();
        }
        self.symbol(SymbolKind::Text, start)
    }

    /// Tokenize `{{` or `{{{` and enter tag mode.
    fn tokenize_open_delimiter(&mut self) -> Symbol<'src> {
        let start = self.pos;
        if self.starts_with("{{{") {
            self.advance_by(3);
            self.mode = Mode::Tag { raw: true };
            self.symbol(SymbolKind::RawOpenDelimiter, start)
        } else {
            self.advance_by(2);
            self.mode = Mode::Tag { raw: false };
            self.symbol(SymbolKind::OpenDelimiter, start)
        }
    }

    /// Tokenize one symbol between tag delimiters.
    fn tokenize_tag(&mut self, raw: bool) -> Symbol<'src> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.symbol(SymbolKind::Eof, start);
        };

        let single = |kind: SymbolKind| (1usize, kind);
        let (len, kind) = match c {
            '}' if raw && self.starts_with("}}}") => {
                self.mode = Mode::Content;
                (3, SymbolKind::RawCloseDelimiter)
            }
            '}' if self.starts_with("}}") => {
                self.mode = Mode::Content;
                (2, SymbolKind::CloseDelimiter)
            }
            // An unterminated tag followed by a new one
            '{' if self.starts_with("{{") => return self.tokenize_open_delimiter(),
            '}' => single(SymbolKind::RightBrace),
            '{' => single(SymbolKind::LeftBrace),
            '[' => single(SymbolKind::LeftBracket),
            ']' => single(SymbolKind::RightBracket),
            '(' => single(SymbolKind::LeftParen),
            ')' => single(SymbolKind::RightParen),
            '|' => single(SymbolKind::Pipe),
            '#' => single(SymbolKind::Hash),
            '/' => single(SymbolKind::Slash),
            '~' => single(SymbolKind::Tilde),
            '=' => single(SymbolKind::Assign),
            '!' => {
                self.mode = Mode::CommentBody { raw };
                single(SymbolKind::Bang)
            }
            '"' | '\'' => return self.tokenize_string(c),
            c if c.is_whitespace() => return self.tokenize_whitespace(),
            _ => return self.tokenize_word(),
        };

        self.advance_by(len);
        self.symbol(kind, start)
    }

    /// Tokenize whitespace (including newlines) inside a tag.
    fn tokenize_whitespace(&mut self) -> Symbol<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
        self.symbol(SymbolKind::Whitespace, start)
    }

    /// Tokenize an identifier, keyword or number.
    fn tokenize_word(&mut self) -> Symbol<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_word_char(c) {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start as usize..self.pos as usize];
        let kind = if is_number(text) {
            SymbolKind::Number
        } else if KEYWORDS.contains(&text) {
            SymbolKind::Keyword
        } else {
            SymbolKind::Identifier
        };
        self.symbol(kind, start)
    }

    /// Tokenize a quoted literal: `"..."` or `'...'`.
    fn tokenize_string(&mut self, quote: char) -> Symbol<'src> {
        let start = self.pos;

        // Consume opening quote
        self.advance();

        loop {
            match self.peek() {
                None => {
                    // Unterminated string
                    return self.symbol(SymbolKind::Error, start);
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        self.symbol(SymbolKind::String, start)
    }

    /// Tokenize the body of a comment tag as a single symbol.
    fn tokenize_comment_body(&mut self, raw: bool) -> Symbol<'src> {
        self.mode = Mode::Tag { raw };

        let len = comment_body_len(self.remaining, raw);
        if len == 0 {
            // `{{!}}`: nothing to swallow
            return self.tokenize_tag(raw);
        }

        let start = self.pos;
        self.advance_by(len);
        self.symbol(SymbolKind::Comment, start)
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Symbol<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let symbol = self.next_token();
        if symbol.is_eof() { None } else { Some(symbol) }
    }
}

/// Length in bytes of a comment body starting at `rest`.
///
/// A long comment (`--` ... `--`) may contain closing delimiters; a short
/// one ends at the first closing delimiter. A `~` right before the
/// delimiter is not part of the body.
fn comment_body_len(rest: &str, raw: bool) -> usize {
    let close = if raw { "}}}" } else { "}}" };

    let body_end = |delimiter_at: usize| {
        if rest[..delimiter_at].ends_with('~') {
            delimiter_at - 1
        } else {
            delimiter_at
        }
    };

    if rest.starts_with("--") {
        for (at, _) in rest.match_indices(close) {
            let end = body_end(at);
            if end >= 4 && rest[..end].ends_with("--") {
                return end;
            }
        }
    }

    match rest.find(close) {
        Some(at) => body_end(at),
        None => rest.len(),
    }
}

/// Check if a character can be part of an identifier, keyword or number.
fn is_word_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '{' | '}' | '[' | ']' | '(' | ')' | '|' | '=' | '~' | '#' | '!' | '"' | '\'' | '/'
        )
}

/// `-?[0-9]+(\.[0-9]+)?`
fn is_number(text: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    match unsigned.split_once('.') {
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => all_digits(unsigned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<(SymbolKind, &str)> {
        Tokenizer::new(source).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            tokenize("hello\nworld"),
            vec![(SymbolKind::Text, "hello\nworld")]
        );
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            tokenize("a{{b}}c"),
            vec![
                (SymbolKind::Text, "a"),
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Identifier, "b"),
                (SymbolKind::CloseDelimiter, "}}"),
                (SymbolKind::Text, "c"),
            ]
        );
        assert_eq!(
            tokenize("{{{b}}}"),
            vec![
                (SymbolKind::RawOpenDelimiter, "{{{"),
                (SymbolKind::Identifier, "b"),
                (SymbolKind::RawCloseDelimiter, "}}}"),
            ]
        );
    }

    #[test]
    fn test_plain_tag_closed_before_extra_brace() {
        assert_eq!(
            tokenize("{{b}}}"),
            vec![
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Identifier, "b"),
                (SymbolKind::CloseDelimiter, "}}"),
                (SymbolKind::Text, "}"),
            ]
        );
    }

    #[test]
    fn test_block_tag_symbols() {
        assert_eq!(
            tokenize("{{~#each items as |item|~}}"),
            vec![
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Tilde, "~"),
                (SymbolKind::Hash, "#"),
                (SymbolKind::Identifier, "each"),
                (SymbolKind::Whitespace, " "),
                (SymbolKind::Identifier, "items"),
                (SymbolKind::Whitespace, " "),
                (SymbolKind::Keyword, "as"),
                (SymbolKind::Whitespace, " "),
                (SymbolKind::Pipe, "|"),
                (SymbolKind::Identifier, "item"),
                (SymbolKind::Pipe, "|"),
                (SymbolKind::Tilde, "~"),
                (SymbolKind::CloseDelimiter, "}}"),
            ]
        );
    }

    #[test]
    fn test_close_tag_symbols() {
        assert_eq!(
            tokenize("{{/if}}"),
            vec![
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Slash, "/"),
                (SymbolKind::Identifier, "if"),
                (SymbolKind::CloseDelimiter, "}}"),
            ]
        );
    }

    #[test]
    fn test_hash_arguments() {
        assert_eq!(
            tokenize("{{link \"a b\" size=12 (sub x) [odd key]}}"),
            vec![
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Identifier, "link"),
                (SymbolKind::Whitespace, " "),
                (SymbolKind::String, "\"a b\""),
                (SymbolKind::Whitespace, " "),
                (SymbolKind::Identifier, "size"),
                (SymbolKind::Assign, "="),
                (SymbolKind::Number, "12"),
                (SymbolKind::Whitespace, " "),
                (SymbolKind::LeftParen, "("),
                (SymbolKind::Identifier, "sub"),
                (SymbolKind::Whitespace, " "),
                (SymbolKind::Identifier, "x"),
                (SymbolKind::RightParen, ")"),
                (SymbolKind::Whitespace, " "),
                (SymbolKind::LeftBracket, "["),
                (SymbolKind::Identifier, "odd"),
                (SymbolKind::Whitespace, " "),
                (SymbolKind::Identifier, "key"),
                (SymbolKind::RightBracket, "]"),
                (SymbolKind::CloseDelimiter, "}}"),
            ]
        );
    }

    #[test]
    fn test_keywords_and_numbers() {
        let kinds: Vec<_> = tokenize("{{x true else -1.5 1.x ../up}}")
            .into_iter()
            .filter(|(kind, _)| *kind != SymbolKind::Whitespace)
            .collect();
        assert_eq!(
            kinds,
            vec![
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Identifier, "x"),
                (SymbolKind::Keyword, "true"),
                (SymbolKind::Keyword, "else"),
                (SymbolKind::Number, "-1.5"),
                (SymbolKind::Identifier, "1.x"),
                (SymbolKind::Identifier, ".."),
                (SymbolKind::Slash, "/"),
                (SymbolKind::Identifier, "up"),
                (SymbolKind::CloseDelimiter, "}}"),
            ]
        );
    }

    #[test]
    fn test_short_comment() {
        assert_eq!(
            tokenize("{{! note }}x"),
            vec![
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Bang, "!"),
                (SymbolKind::Comment, " note "),
                (SymbolKind::CloseDelimiter, "}}"),
                (SymbolKind::Text, "x"),
            ]
        );
    }

    #[test]
    fn test_long_comment_may_contain_delimiters() {
        assert_eq!(
            tokenize("{{!-- {{#if}} }} --~}}"),
            vec![
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Bang, "!"),
                (SymbolKind::Comment, "-- {{#if}} }} --"),
                (SymbolKind::Tilde, "~"),
                (SymbolKind::CloseDelimiter, "}}"),
            ]
        );
    }

    #[test]
    fn test_empty_comment() {
        assert_eq!(
            tokenize("{{!}}"),
            vec![
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Bang, "!"),
                (SymbolKind::CloseDelimiter, "}}"),
            ]
        );
    }

    #[test]
    fn test_escaped_delimiter_is_text() {
        assert_eq!(
            tokenize("a \\{{b}} c"),
            vec![(SymbolKind::Text, "a \\{{b}} c")]
        );
    }

    #[test]
    fn test_unterminated_tag_then_new_tag() {
        assert_eq!(
            tokenize("{{a {{b}}"),
            vec![
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Identifier, "a"),
                (SymbolKind::Whitespace, " "),
                (SymbolKind::OpenDelimiter, "{{"),
                (SymbolKind::Identifier, "b"),
                (SymbolKind::CloseDelimiter, "}}"),
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let symbols = tokenize("{{x \"oops}}");
        assert!(
            symbols.iter().any(|t| t.0 == SymbolKind::Error),
            "Expected Error symbol for unterminated string, got {:?}",
            symbols
        );
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut tokenizer = Tokenizer::new("x");
        assert_eq!(tokenizer.next_token().kind, SymbolKind::Text);
        assert!(tokenizer.next_token().is_eof());
        assert!(tokenizer.next_token().is_eof());
        assert_eq!(tokenizer.position(), 1);
    }

    #[test]
    fn test_symbols_cover_source() {
        let source = "Hi {{~#if a.b~}} {{{raw}}} {{!-- c --}}{{/if}} \\{{ é";
        let joined: String = Tokenizer::new(source).map(|t| t.text).collect();
        assert_eq!(joined, source);
    }
}
