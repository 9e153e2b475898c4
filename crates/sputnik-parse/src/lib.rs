#![doc = include_str!("../README.md")]

/// The name of the default sector and the default section.
///
/// Assignments before any header land in the `root` sector's `root`
/// section, and an empty `:` or `@` header returns there.
pub const ROOT: &str = "root";

mod escape;
pub use escape::{desanitize, sanitize};

mod split;
pub use split::split_on;

mod span;
pub use span::Span;

mod line;
pub use line::Line;

mod parser;
pub use parser::{Event, Parser};
