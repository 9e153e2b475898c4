#![doc = include_str!("../README.md")]

mod builder;
mod diagnostic;
mod value;

pub use builder::TreeBuilder;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use sputnik_parse::{Event, Parser, ROOT, Span};
pub use value::{Document, Entry, Lookup, Section, Sector};

use std::path::Path;

use tracing::debug;

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Report diagnostics for the lines lenient parsing silently skips
    /// (non-blank unrecognized lines, assignments with an empty key).
    ///
    /// Strict mode never changes what gets stored; it only surfaces the
    /// problems. The default matches the format's reference behavior:
    /// lenient, best-effort, no line-level errors.
    pub strict: bool,
}

/// The outcome of a parse.
#[derive(Debug, Clone)]
pub struct ParseStatus {
    /// Whether the parse succeeded.
    pub success: bool,
    /// 1-based line of the first problem; `None` when the failure is not
    /// line-specific (an unreadable file, for example).
    pub line_number: Option<u32>,
    /// Description of the first problem; empty on success.
    pub message: String,
    /// All strict-mode diagnostics, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseStatus {
    fn ok() -> Self {
        Self {
            success: true,
            line_number: None,
            message: String::new(),
            diagnostics: Vec::new(),
        }
    }

    fn io_error(err: &std::io::Error) -> Self {
        Self {
            success: false,
            line_number: None,
            message: err.to_string(),
            diagnostics: Vec::new(),
        }
    }

    fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        match diagnostics.first() {
            None => Self::ok(),
            Some(first) => Self {
                success: false,
                line_number: Some(first.line),
                message: first.message().to_string(),
                diagnostics,
            },
        }
    }
}

/// Parse Sputnik source text into a fresh document (lenient mode).
pub fn parse(source: &str) -> Document {
    let mut doc = Document::new();
    doc.parse_str(source);
    doc
}

impl Document {
    /// Parse `text` into this document, replacing its prior contents.
    ///
    /// Lenient mode: always succeeds.
    pub fn parse_str(&mut self, text: &str) -> ParseStatus {
        self.parse_str_with(text, ParseOptions::default())
    }

    /// Parse `text` with explicit options.
    pub fn parse_str_with(&mut self, text: &str, options: ParseOptions) -> ParseStatus {
        debug!(strict = options.strict, bytes = text.len(), "parsing sputnik text");

        let mut parser = Parser::new(text);
        let mut builder = TreeBuilder::with_options(options);
        while let Some(event) = parser.next_event() {
            builder.event(event);
        }
        let (doc, diagnostics) = builder.finish();
        *self = doc;
        ParseStatus::from_diagnostics(diagnostics)
    }

    /// Parse the file at `path`, replacing prior contents.
    ///
    /// If the file cannot be read, the document is left untouched and the
    /// returned status carries the I/O error with no line number.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> ParseStatus {
        self.parse_file_with(path, ParseOptions::default())
    }

    /// Parse the file at `path` with explicit options.
    pub fn parse_file_with(&mut self, path: impl AsRef<Path>, options: ParseOptions) -> ParseStatus {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                debug!(path = %path.display(), %err, "failed to read sputnik file");
                return ParseStatus::io_error(&err);
            }
        };
        self.parse_str_with(&text, options)
    }
}
