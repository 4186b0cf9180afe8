//! Parse diagnostics and their rendering.

use ariadne::{Color, Label, Report, ReportKind, Source};
use hbs_tokenizer::Location;

/// A fatal parser failure. Distinct from [`Diagnostic`]s, which never stop
/// a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An operation needed an open block but the parse context has none
    /// (the parse was never started, or the root was already closed).
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidState { operation } => {
                write!(f, "invalid parser state: `{}` needs an open block", operation)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Kinds of recoverable problems found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A closing tag names a different block than the one it closes.
    UnbalancedTag {
        /// Name of the open block.
        expected: String,
        /// Name written in the closing tag.
        actual: String,
        /// Where the open block's opening tag is.
        opened_at: Option<Location>,
    },
    /// A closing tag with no block open.
    UnexpectedCloseTag {
        /// Name written in the closing tag.
        name: String,
    },
    /// A block still open at the end of input.
    UnclosedBlock {
        /// Name of the open block.
        name: String,
    },
    /// A tag without its closing delimiter.
    UnclosedTag,
    /// `{{{` closed by `}}`, or `{{` closed by `}}}`.
    MismatchedDelimiter,
    /// Content after a `~` that does not precede the closing delimiter.
    UnexpectedSymbol,
}

/// A recoverable parse problem with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The kind of problem.
    pub kind: DiagnosticKind,
    /// Source location.
    pub location: Location,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(kind: DiagnosticKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Human readable description, without location.
    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::UnbalancedTag {
                expected, actual, ..
            } => format!(
                "closing tag `{}` does not match open block `{}`",
                actual, expected
            ),
            DiagnosticKind::UnexpectedCloseTag { name } => {
                format!("closing tag `{}` has no open block", name)
            }
            DiagnosticKind::UnclosedBlock { name } => {
                format!("block `{}` is never closed", name)
            }
            DiagnosticKind::UnclosedTag => "tag is not closed".to_string(),
            DiagnosticKind::MismatchedDelimiter => {
                "tag opened and closed with different delimiters".to_string()
            }
            DiagnosticKind::UnexpectedSymbol => "unexpected content after `~`".to_string(),
        }
    }

    /// Render this diagnostic with ariadne.
    ///
    /// Returns a string containing the formatted message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range: std::ops::Range<usize> = self.location.into();

        match &self.kind {
            DiagnosticKind::UnbalancedTag {
                expected,
                actual,
                opened_at,
            } => {
                let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(self.message())
                    .with_label(
                        Label::new((filename, range))
                            .with_message(format!("expected `{}`", expected))
                            .with_color(Color::Red),
                    );
                if let Some(opened_at) = opened_at {
                    report = report.with_label(
                        Label::new((filename, (*opened_at).into()))
                            .with_message(format!("`{}` opened here", expected))
                            .with_color(Color::Blue),
                    );
                }
                report.with_help(format!("rename `{}` to `{}`", actual, expected))
            }

            DiagnosticKind::UnexpectedCloseTag { .. } => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(self.message())
                    .with_label(
                        Label::new((filename, range))
                            .with_message("nothing to close")
                            .with_color(Color::Red),
                    )
            }

            DiagnosticKind::UnclosedBlock { name } => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(self.message())
                    .with_label(
                        Label::new((filename, range))
                            .with_message("block opened here")
                            .with_color(Color::Red),
                    )
                    .with_help(format!("add `{{{{/{}}}}}`", name))
            }

            DiagnosticKind::UnclosedTag => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(self.message())
                .with_label(
                    Label::new((filename, range))
                        .with_message("expected `}}` here")
                        .with_color(Color::Red),
                ),

            DiagnosticKind::MismatchedDelimiter => {
                Report::build(ReportKind::Warning, (filename, range.clone()))
                    .with_message(self.message())
                    .with_label(
                        Label::new((filename, range))
                            .with_message("closing delimiter")
                            .with_color(Color::Yellow),
                    )
                    .with_help("`{{{` pairs with `}}}` and `{{` with `}}`")
            }

            DiagnosticKind::UnexpectedSymbol => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(self.message())
                    .with_label(
                        Label::new((filename, range))
                            .with_message("unexpected")
                            .with_color(Color::Red),
                    )
                    .with_help("`~` may only appear next to a delimiter")
            }
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.message(), self.location.start)
    }
}

impl std::error::Error for Diagnostic {}
