//! TOML codec for ruleset documents.
//!
//! Rule files are TOML documents in which every top-level key names a
//! category whose table holds a single `patterns` array of strings:
//!
//! ```toml
//! [IDE]
//! patterns = [
//!   ".idea/",
//!   ".atom/", # Atom editor
//! ]
//! ```
//!
//! The inline form `IDE = { patterns = [".idea/"] }` is accepted as well.
//! A `# ...` comment on the same line as a pattern is kept as that pattern's
//! comment; comments on lines of their own are not attached to anything.
//!
//! # Modules
//!
//! - [`parse`]: [`parse`](parse::parse) text into a [`RuleDocument`]
//! - [`render`]: [`render`](render::render) a [`RuleDocument`] back to text
//! - [`descriptions`]: banner descriptions for well-known categories
//! - [`error`]: [`ParseError`] and [`Location`]
//!
//! [`RuleDocument`]: ruleset_types::RuleDocument

pub mod descriptions;
pub mod error;
pub mod parse;
pub mod render;

pub use descriptions::describe_category;
pub use error::{Location, ParseError, Result};
pub use parse::parse;
pub use render::render;

/// The only key allowed inside a category table.
pub const PATTERNS_KEY: &str = "patterns";
