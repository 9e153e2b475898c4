//! Line classification for the Sputnik data format.

use crate::split_on;

/// A classified source line.
///
/// Classification is by first character, mutually exclusive, in this
/// priority order: section header, object header, comment, assignment,
/// anything else. Text is carried in its on-disk (sanitized) form; the
/// parser desanitizes at the point it emits events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'src> {
    /// `:DESCRIPTOR` — open or continue a section.
    Section {
        /// Everything after the `:`, possibly empty.
        descriptor: &'src str,
    },
    /// `@DESCRIPTOR` — open a new object instance.
    Object {
        /// Everything after the `@`, possibly empty.
        descriptor: &'src str,
    },
    /// `;...` — a comment, no effect.
    Comment {
        /// The whole line, including the `;`.
        text: &'src str,
    },
    /// `KEY=VALUE` — assign into the current target map.
    ///
    /// The line is split on every `=`: the key is piece 0 and the value is
    /// piece 1, so an unescaped `=` inside a value silently truncates it.
    /// The writer must escape embedded `=` as `$eq`; this is a known
    /// limitation of the format, preserved here.
    Assignment {
        key: &'src str,
        value: &'src str,
    },
    /// Anything else: blank or unrecognized, no effect.
    Ignored {
        /// The whole line.
        text: &'src str,
    },
}

impl<'src> Line<'src> {
    /// Classify a single line (no trailing terminator).
    pub fn classify(text: &'src str) -> Self {
        if let Some(descriptor) = text.strip_prefix(':') {
            Line::Section { descriptor }
        } else if let Some(descriptor) = text.strip_prefix('@') {
            Line::Object { descriptor }
        } else if text.starts_with(';') {
            Line::Comment { text }
        } else if text.contains('=') {
            let pieces = split_on(text, '=');
            Line::Assignment {
                key: pieces.first().copied().unwrap_or(""),
                value: pieces.get(1).copied().unwrap_or(""),
            }
        } else {
            Line::Ignored { text }
        }
    }
}
