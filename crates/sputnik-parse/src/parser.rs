//! Pull-based event parser for Sputnik source text.

use std::borrow::Cow;

use tracing::trace;

use crate::{Line, ROOT, Span, desanitize, split_on};

/// Events emitted by the parser, exactly one per source line.
///
/// Names, keys, and values are desanitized here, at the boundary between
/// on-disk and in-memory text; consumers only ever see decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'src> {
    /// A `:name` or `:sector>name` header: open or continue a section.
    SectionStart {
        /// Sector the section lives in; `"root"` when the descriptor has
        /// no `>` prefix.
        sector: Cow<'src, str>,
        /// Local section name.
        name: Cow<'src, str>,
        /// 1-based source line.
        line: u32,
        /// Byte span of the line.
        span: Span,
    },
    /// An `@name` or `@sector>name` header: open a brand-new object.
    ObjectStart {
        /// Sector the object lives in; `"root"` when the descriptor has
        /// no `>` prefix.
        sector: Cow<'src, str>,
        /// Local object name.
        name: Cow<'src, str>,
        /// 1-based source line.
        line: u32,
        /// Byte span of the line.
        span: Span,
    },
    /// An empty `:` or `@` header: return to the default sector's root
    /// section (root-kickback).
    RootReset {
        /// 1-based source line.
        line: u32,
        /// Byte span of the line.
        span: Span,
    },
    /// A `key=value` assignment for the current target.
    Assign {
        key: Cow<'src, str>,
        value: Cow<'src, str>,
        /// 1-based source line.
        line: u32,
        /// Byte span of the line.
        span: Span,
    },
    /// A `;...` comment line, no effect.
    Comment {
        /// The whole line, including the `;`.
        text: &'src str,
        /// 1-based source line.
        line: u32,
        /// Byte span of the line.
        span: Span,
    },
    /// A line with no effect: blank or unrecognized.
    Ignored {
        /// The whole line.
        text: &'src str,
        /// 1-based source line.
        line: u32,
        /// Byte span of the line.
        span: Span,
    },
}

impl Event<'_> {
    /// 1-based source line this event came from.
    pub fn line(&self) -> u32 {
        match self {
            Event::SectionStart { line, .. }
            | Event::ObjectStart { line, .. }
            | Event::RootReset { line, .. }
            | Event::Assign { line, .. }
            | Event::Comment { line, .. }
            | Event::Ignored { line, .. } => *line,
        }
    }

    /// Byte span of the source line this event came from.
    pub fn span(&self) -> Span {
        match self {
            Event::SectionStart { span, .. }
            | Event::ObjectStart { span, .. }
            | Event::RootReset { span, .. }
            | Event::Assign { span, .. }
            | Event::Comment { span, .. }
            | Event::Ignored { span, .. } => *span,
        }
    }
}

/// Pull-based parser: splits the source into lines and classifies each.
///
/// Lines are split on `\n`; one trailing `\r` is stripped per line, so
/// lines reach the classifier with no trailing terminator. A literal CR
/// inside a stored value can therefore only come from the `$r` escape.
#[derive(Clone)]
pub struct Parser<'src> {
    /// The source text being parsed.
    source: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// Lines consumed so far.
    line: u32,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 0,
        }
    }

    /// Get the next event, or `None` at end of input.
    pub fn next_event(&mut self) -> Option<Event<'src>> {
        let (raw, span) = self.next_line()?;
        self.line += 1;
        let line = self.line;
        let text = raw.strip_suffix('\r').unwrap_or(raw);

        let event = match Line::classify(text) {
            Line::Section { descriptor } | Line::Object { descriptor }
                if descriptor.is_empty() =>
            {
                Event::RootReset { line, span }
            }
            Line::Section { descriptor } => {
                let (sector, name) = split_descriptor(descriptor);
                Event::SectionStart {
                    sector,
                    name,
                    line,
                    span,
                }
            }
            Line::Object { descriptor } => {
                let (sector, name) = split_descriptor(descriptor);
                Event::ObjectStart {
                    sector,
                    name,
                    line,
                    span,
                }
            }
            Line::Comment { text } => Event::Comment { text, line, span },
            Line::Assignment { key, value } => Event::Assign {
                key: desanitize(key),
                value: desanitize(value),
                line,
                span,
            },
            Line::Ignored { text } => Event::Ignored { text, line, span },
        };

        trace!("Event at line {line}: {event:?}");
        Some(event)
    }

    /// Parse all remaining events into a vector.
    pub fn parse_to_vec(mut self) -> Vec<Event<'src>> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event() {
            events.push(event);
        }
        events
    }

    /// Take the next line off the source, with its byte span (terminator
    /// excluded). Returns `None` once the cursor reaches end of text, so a
    /// trailing newline yields no final empty line.
    fn next_line(&mut self) -> Option<(&'src str, Span)> {
        let rest = &self.source[self.pos as usize..];
        if rest.is_empty() {
            return None;
        }

        let (len, term) = match rest.find('\n') {
            Some(i) => (i, 1),
            None => (rest.len(), 0),
        };

        let start = self.pos;
        let text = &rest[..len];
        self.pos += (len + term) as u32;
        Some((text, Span::new(start, start + len as u32)))
    }
}

impl<'src> Iterator for Parser<'src> {
    type Item = Event<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

/// Split a header descriptor on `>` into (sector, local name).
///
/// More than one piece means piece 0 is the sector and piece 1 the local
/// name; otherwise the sector is `"root"` and the whole descriptor is the
/// name. Both halves are desanitized.
fn split_descriptor(descriptor: &str) -> (Cow<'_, str>, Cow<'_, str>) {
    let pieces = split_on(descriptor, '>');
    if pieces.len() > 1 {
        (desanitize(pieces[0]), desanitize(pieces[1]))
    } else {
        (Cow::Borrowed(ROOT), desanitize(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<Event<'_>> {
        Parser::new(source).parse_to_vec()
    }

    fn assign(key: &str, value: &str, line: u32, span: Span) -> Event<'static> {
        Event::Assign {
            key: Cow::Owned(key.to_string()),
            value: Cow::Owned(value.to_string()),
            line,
            span,
        }
    }

    #[test]
    fn test_assignments_and_line_numbers() {
        let events = parse("a=1\nb=2");
        assert_eq!(
            events,
            vec![
                assign("a", "1", 1, Span::new(0, 3)),
                assign("b", "2", 2, Span::new(4, 7)),
            ]
        );
    }

    #[test]
    fn test_trailing_newline_yields_no_event() {
        assert_eq!(parse("a=1\n").len(), 1);
        assert_eq!(parse("").len(), 0);
    }

    #[test]
    fn test_crlf_stripped() {
        let events = parse("a=1\r\nb=2\r\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], assign("a", "1", 1, Span::new(0, 4)));
    }

    #[test]
    fn test_section_header_default_sector() {
        let events = parse(":favorites");
        assert_eq!(
            events,
            vec![Event::SectionStart {
                sector: Cow::Borrowed(ROOT),
                name: Cow::Borrowed("favorites"),
                line: 1,
                span: Span::new(0, 10),
            }]
        );
    }

    #[test]
    fn test_header_with_sector_prefix() {
        let events = parse("@sector 2>circle");
        assert_eq!(
            events,
            vec![Event::ObjectStart {
                sector: Cow::Borrowed("sector 2"),
                name: Cow::Borrowed("circle"),
                line: 1,
                span: Span::new(0, 16),
            }]
        );
    }

    #[test]
    fn test_root_kickback() {
        let events = parse(":\n@");
        assert!(matches!(events[0], Event::RootReset { line: 1, .. }));
        assert!(matches!(events[1], Event::RootReset { line: 2, .. }));
    }

    #[test]
    fn test_descriptor_desanitized() {
        // A section name with an escaped '>' stays one name rather than
        // splitting into sector and section.
        let events = parse(":a$gtb");
        match &events[0] {
            Event::SectionStart { sector, name, .. } => {
                assert_eq!(sector.as_ref(), ROOT);
                assert_eq!(name.as_ref(), "a>b");
            }
            other => panic!("expected SectionStart, got {other:?}"),
        }
    }

    #[test]
    fn test_assignment_desanitized() {
        let events = parse("escaped$eqkey=a$scb");
        assert_eq!(events, vec![assign("escaped=key", "a;b", 1, Span::new(0, 19))]);
    }

    #[test]
    fn test_comment_and_ignored() {
        let events = parse("; note\n\nstray words");
        assert!(matches!(
            events[0],
            Event::Comment {
                text: "; note",
                line: 1,
                ..
            }
        ));
        assert!(matches!(events[1], Event::Ignored { text: "", .. }));
        assert!(matches!(
            events[2],
            Event::Ignored {
                text: "stray words",
                line: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_span_slices_source() {
        let source = ":favorites\ncolor=red";
        let events = parse(source);
        assert_eq!(events[0].span().slice(source), ":favorites");
        assert_eq!(events[1].span().slice(source), "color=red");
        assert_eq!(events[1].line(), 2);
    }
}
