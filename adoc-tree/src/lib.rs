//! A concrete syntax tree parser for `AsciiDoc`.
//!
//! Parsing never fails: every input, however malformed, yields a [`Tree`] whose leaves
//! cover the source exactly. Problems the parser recovered from are reported as
//! [`Warning`]s on the tree.
//!
//! ```
//! use adoc_tree::{NodeKind, parse};
//!
//! let tree = parse("== Intro\n\nSome *bold* text.\n");
//! let section = tree.root().child_of_kind(NodeKind::Section);
//! assert!(section.is_some());
//! assert!(tree.warnings().is_empty());
//! ```
mod error;
mod grammar;
mod model;
pub mod normalize;
mod options;
mod source;

#[cfg(test)]
mod proptests;

pub use error::{Detail, Error, Warning};
pub use grammar::{
    ColonRole, ExternalToken, OpenRegion, Precedence, RegionKind, SECTION_MARKERS, Scanned,
    Scanner, ScannerState, SectionMarker, ValidTokens, colon_role,
};
pub use model::{
    Descendants, FieldName, InputEdit, Location, Node, NodeKind, Position, Tree, views,
};
pub use options::{DEFAULT_MAX_NESTING, Options, OptionsBuilder};
pub use source::{decode, parse_file};

/// Parse `input` with the default options.
#[must_use]
pub fn parse(input: &str) -> Tree {
    parse_with_options(input, &Options::default())
}

/// Parse `input`.
///
/// # Example
///
/// ```
/// use adoc_tree::{Options, parse_with_options};
///
/// let options = Options::builder().without_inline().build();
/// let tree = parse_with_options("Some *bold* text.\n", &options);
/// assert_eq!(
///     tree.to_sexp(),
///     "(document (paragraph content: (inline_content (text))))"
/// );
/// ```
#[must_use]
pub fn parse_with_options(input: &str, options: &Options) -> Tree {
    Tree::parse(input.to_string(), options.clone())
}
