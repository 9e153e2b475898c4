//! Tree builder from parse events.

use sputnik_parse::{Event, ROOT};

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::value::{Document, Section};
use crate::ParseOptions;

/// Where assignments currently land.
///
/// Targets are held as indices into the document, never as borrowed
/// references: resolving a later header may insert into the sector or
/// section tables, which would invalidate any reference captured earlier.
#[derive(Debug, Clone, Copy)]
enum Target {
    Section { sector: usize, section: usize },
    Object { sector: usize, object: usize },
}

/// Builder that constructs a [`Document`] from parse events.
///
/// This is the parser's state machine: section headers resolve or create
/// their section (re-opening a name merges into it), object headers always
/// append a fresh map, an empty header restores the default target, and
/// assignments write into whatever is current.
pub struct TreeBuilder {
    doc: Document,
    target: Target,
    /// Document-wide object counter, threaded into each object record so
    /// cross-sector enumeration can restore file order.
    objects_created: usize,
    strict: bool,
    diagnostics: Vec<Diagnostic>,
}

impl TreeBuilder {
    /// Create a new tree builder (lenient mode).
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create a tree builder with explicit options.
    pub fn with_options(options: ParseOptions) -> Self {
        let mut doc = Document::new();
        let sector = doc.sector_index(ROOT);
        let section = doc.sector_at_mut(sector).section_index(ROOT);
        Self {
            doc,
            target: Target::Section { sector, section },
            objects_created: 0,
            strict: options.strict,
            diagnostics: Vec::new(),
        }
    }

    /// Feed one event.
    pub fn event(&mut self, event: Event<'_>) {
        match event {
            Event::SectionStart { sector, name, .. } => {
                let sector = self.doc.sector_index(&sector);
                let section = self.doc.sector_at_mut(sector).section_index(&name);
                self.target = Target::Section { sector, section };
            }

            Event::ObjectStart { sector, name, .. } => {
                let sector = self.doc.sector_index(&sector);
                let seq = self.objects_created;
                self.objects_created += 1;
                let object = self
                    .doc
                    .sector_at_mut(sector)
                    .push_object(name.into_owned(), seq);
                self.target = Target::Object { sector, object };
            }

            Event::RootReset { .. } => {
                let sector = self.doc.sector_index(ROOT);
                let section = self.doc.sector_at_mut(sector).section_index(ROOT);
                self.target = Target::Section { sector, section };
            }

            Event::Assign {
                key,
                value,
                line,
                span,
            } => {
                if self.strict && key.is_empty() {
                    self.diagnostics
                        .push(Diagnostic::new(DiagnosticKind::EmptyKey, line, span));
                }
                // Stored regardless; strict mode reports, it never drops.
                self.target_map()
                    .insert(key.into_owned(), value.into_owned());
            }

            Event::Comment { .. } => {}

            Event::Ignored { text, line, span } => {
                if self.strict && !text.trim().is_empty() {
                    self.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnrecognizedLine,
                        line,
                        span,
                    ));
                }
            }
        }
    }

    /// Finish building, returning the document and any strict-mode
    /// diagnostics (always empty in lenient mode).
    pub fn finish(self) -> (Document, Vec<Diagnostic>) {
        (self.doc, self.diagnostics)
    }

    fn target_map(&mut self) -> &mut Section {
        match self.target {
            Target::Section { sector, section } => {
                self.doc.sector_at_mut(sector).section_at_mut(section)
            }
            Target::Object { sector, object } => {
                self.doc.sector_at_mut(sector).object_at_mut(object)
            }
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use sputnik_parse::Parser;

    use super::*;
    use crate::Lookup;

    fn build(source: &str) -> Document {
        let mut parser = Parser::new(source);
        let mut builder = TreeBuilder::new();
        while let Some(event) = parser.next_event() {
            builder.event(event);
        }
        builder.finish().0
    }

    #[test]
    fn test_assignments_before_any_header() {
        let doc = build("title=hello\n");
        assert_eq!(doc.value("title"), "hello");
    }

    #[test]
    fn test_last_write_wins() {
        let doc = build(":favorites\ncolor=green\ncolor=red\n");
        assert_eq!(
            doc.value_at("color", Lookup { section: "favorites", ..Lookup::default() }),
            "red"
        );
    }

    #[test]
    fn test_section_merge() {
        let doc = build(":favorites\nanimal=cat\n:other\nx=1\n:favorites\nfood=bread\n");
        let favorites = doc.root().section("favorites").unwrap();
        assert_eq!(favorites.get("animal"), Some("cat"));
        assert_eq!(favorites.get("food"), Some("bread"));
    }

    #[test]
    fn test_sector_isolation() {
        let doc = build(":favorites\ncolor=red\n:sector 2>favorites\ncolor=black\n");
        assert_eq!(
            doc.value_at("color", Lookup { section: "favorites", sector: "root" }),
            "red"
        );
        assert_eq!(
            doc.value_at("color", Lookup { section: "favorites", sector: "sector 2" }),
            "black"
        );
    }

    #[test]
    fn test_object_multiplicity() {
        let doc = build("@circle\nradius=5\n@circle\nradius=9\ncolor=blue\n");
        let circles = doc.objects_named("circle");
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].get("radius"), Some("5"));
        assert!(!circles[0].contains_key("color"));
        assert_eq!(circles[1].get("radius"), Some("9"));
        assert_eq!(circles[1].get("color"), Some("blue"));
    }

    #[test]
    fn test_root_kickback() {
        let doc = build(":favorites\ncolor=red\n:\nback=home\n@circle\nradius=5\n@\nalso=home\n");
        assert_eq!(doc.value("back"), "home");
        assert_eq!(doc.value("also"), "home");
        // Nothing leaked into the section or object.
        assert_eq!(doc.root().section("favorites").unwrap().len(), 1);
        assert_eq!(doc.objects_named("circle")[0].len(), 1);
    }

    #[test]
    fn test_escaped_names_resolve_to_literals() {
        let doc = build(":lines$gtand$atsigns\nkey=value\n");
        assert_eq!(
            doc.value_at("key", Lookup { section: "lines>and@signs", ..Lookup::default() }),
            "value"
        );
    }

    #[test]
    fn test_lenient_ignores_junk() {
        let (doc, diagnostics) = {
            let mut parser = Parser::new("junk line\na=1\n");
            let mut builder = TreeBuilder::new();
            while let Some(event) = parser.next_event() {
                builder.event(event);
            }
            builder.finish()
        };
        assert!(diagnostics.is_empty());
        assert_eq!(doc.value("a"), "1");
    }

    #[test]
    fn test_strict_reports_but_still_stores() {
        let mut parser = Parser::new("junk line\n=anonymous\na=1\n");
        let mut builder = TreeBuilder::with_options(ParseOptions { strict: true });
        while let Some(event) = parser.next_event() {
            builder.event(event);
        }
        let (doc, diagnostics) = builder.finish();

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnrecognizedLine);
        assert_eq!(diagnostics[0].line, 1);
        assert_eq!(diagnostics[1].kind, DiagnosticKind::EmptyKey);
        assert_eq!(diagnostics[1].line, 2);
        // Best-effort storage is unchanged by strict mode.
        assert_eq!(doc.value(""), "anonymous");
        assert_eq!(doc.value("a"), "1");
    }

    #[test]
    fn test_blank_lines_never_diagnosed() {
        let mut parser = Parser::new("\n   \na=1\n");
        let mut builder = TreeBuilder::with_options(ParseOptions { strict: true });
        while let Some(event) = parser.next_event() {
            builder.event(event);
        }
        let (_, diagnostics) = builder.finish();
        assert!(diagnostics.is_empty());
    }
}
