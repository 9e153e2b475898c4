//! Diagnostic rendering for strict-mode parsing.

use ariadne::{Color, Label, Report, ReportKind, Source};
use sputnik_parse::Span;

/// Kinds of strict-mode diagnostics.
///
/// The format's reference behavior is lenient: all of these lines are
/// silently skipped or best-effort parsed. Strict mode surfaces them
/// without changing what gets stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A non-blank line that is not a header, comment, or assignment.
    UnrecognizedLine,
    /// An assignment whose key desanitizes to the empty string.
    EmptyKey,
}

/// A strict-mode diagnostic with source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    /// The kind of problem.
    pub kind: DiagnosticKind,
    /// 1-based source line.
    pub line: u32,
    /// Byte span of the offending line.
    pub span: Span,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(kind: DiagnosticKind, line: u32, span: Span) -> Self {
        Self { kind, line, span }
    }

    /// Short description of the problem, without location.
    pub fn message(&self) -> &'static str {
        match self.kind {
            DiagnosticKind::UnrecognizedLine => "unrecognized line",
            DiagnosticKind::EmptyKey => "assignment with empty key",
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

    /// Write the diagnostic report to a writer.
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
        let range = self.span.start as usize..self.span.end as usize;

        match self.kind {
            DiagnosticKind::UnrecognizedLine => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("unrecognized line")
                    .with_label(
                        Label::new((filename, range))
                            .with_message("not a header, comment, or assignment")
                            .with_color(Color::Red),
                    )
                    .with_help("lines must start with ':', '@' or ';', or contain '='")
            }

            DiagnosticKind::EmptyKey => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("assignment with empty key")
                .with_label(
                    Label::new((filename, range))
                        .with_message("nothing before the '='")
                        .with_color(Color::Red),
                )
                .with_help("write the key before '=', escaping structural characters"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}", self.message(), self.line)
    }
}

impl std::error::Error for Diagnostic {}
