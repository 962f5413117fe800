//! Error types for parsing rule files.

use std::fmt;

use ruleset_types::TypeError;
use thiserror::Error;

/// A 1-based position in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Translate a byte offset into a line/column pair. Offsets past the end
    /// or inside a multi-byte character are clamped.
    pub fn at_offset(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors produced while parsing a rule file.
///
/// Parsing is all-or-nothing: on error no document is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text is not valid TOML (unterminated list, duplicate key, ...).
    #[error("syntax error{}: {message}", at(.location))]
    Syntax {
        message: String,
        location: Option<Location>,
    },

    /// A top-level entry is not a table.
    #[error("category {category:?} must be a table, found {found}{}", at(.location))]
    NotATable {
        category: String,
        found: String,
        location: Option<Location>,
    },

    /// A category table has no `patterns` key.
    #[error("category {category:?} has no `patterns` list{}", at(.location))]
    MissingPatterns {
        category: String,
        location: Option<Location>,
    },

    /// `patterns` is not an array.
    #[error("category {category:?}: `patterns` must be an array, found {found}{}", at(.location))]
    PatternsNotArray {
        category: String,
        found: String,
        location: Option<Location>,
    },

    /// An element of `patterns` is not a string.
    #[error(
        "category {category:?}: pattern #{index} must be a string, found {found}{}",
        at(.location)
    )]
    PatternNotString {
        category: String,
        index: usize,
        found: String,
        location: Option<Location>,
    },

    /// A category table holds a key other than `patterns`.
    #[error("category {category:?}: unknown key {key:?}{}", at(.location))]
    UnknownKey {
        category: String,
        key: String,
        location: Option<Location>,
    },

    /// The category name or layout violates the model.
    #[error(transparent)]
    Model(#[from] TypeError),
}

impl ParseError {
    pub(crate) fn from_toml(source: &str, err: &toml_edit::TomlError) -> Self {
        Self::Syntax {
            message: err.message().trim().to_string(),
            location: err.span().map(|span| Location::at_offset(source, span.start)),
        }
    }

    /// The source position of the error, when known.
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::Syntax { location, .. }
            | Self::NotATable { location, .. }
            | Self::MissingPatterns { location, .. }
            | Self::PatternsNotArray { location, .. }
            | Self::PatternNotString { location, .. }
            | Self::UnknownKey { location, .. } => *location,
            Self::Model(_) => None,
        }
    }
}

fn at(location: &Option<Location>) -> String {
    location.map(|l| format!(" at {l}")).unwrap_or_default()
}

/// Convenience alias for parse results.
pub type Result<T> = std::result::Result<T, ParseError>;
