//! Foundation types for ruleset.
//!
//! A rule document is a set of named categories, each holding an ordered list
//! of ignore-style patterns. Every other ruleset crate depends on
//! `ruleset-types`.
//!
//! # Key Types
//!
//! - [`Pattern`]: One rule line with an optional trailing comment
//! - [`Category`]: A named, duplicate-free, insertion-ordered list of patterns
//! - [`RuleDocument`]: Categories keyed by name, in declaration order
//!
//! The model enforces its own invariants: a category never holds two patterns
//! with the same text, and a document never holds an empty category.

pub mod category;
pub mod document;
pub mod error;
pub mod names;
pub mod pattern;

pub use category::Category;
pub use document::RuleDocument;
pub use error::{Result, TypeError};
pub use names::{is_bare_key, validate_category_name};
pub use pattern::Pattern;
