use std::fmt;

use serde::Serialize;

/// A single rule line.
///
/// `text` is the literal rule (negation prefix, wildcards and directory
/// suffix included). `comment` is an optional human annotation written after
/// the rule on the same line. Equality compares both fields; deduplication
/// inside a [`Category`](crate::Category) looks at `text` only.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pattern {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl Pattern {
    /// A pattern without a comment.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            comment: None,
        }
    }

    /// A pattern carrying a trailing comment.
    ///
    /// The comment must fit on one line: line breaks and other control
    /// characters become spaces and surrounding whitespace is trimmed. A
    /// comment that is empty after trimming is dropped.
    pub fn with_comment(text: impl Into<String>, comment: impl AsRef<str>) -> Self {
        Self {
            text: text.into(),
            comment: normalize_comment(comment.as_ref()),
        }
    }

    /// A pattern with an optional comment.
    pub fn annotated(text: impl Into<String>, comment: Option<&str>) -> Self {
        match comment {
            Some(comment) => Self::with_comment(text, comment),
            None => Self::new(text),
        }
    }

    /// The literal rule string.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The trailing annotation, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns `true` if the text is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.comment {
            Some(comment) => write!(f, "{:?} # {}", self.text, comment),
            None => write!(f, "{:?}", self.text),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn normalize_comment(raw: &str) -> Option<String> {
    let flattened: String = raw
        .chars()
        .map(|c| if c.is_control() && c != '\t' { ' ' } else { c })
        .collect();
    let trimmed = flattened.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
