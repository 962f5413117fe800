//! Named pattern groups.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::names::validate_category_name;
use crate::pattern::Pattern;

/// A named group of patterns.
///
/// Patterns are kept in insertion order and keyed by their text, so a
/// category never holds two patterns with the same `text`. The first pattern
/// pushed for a given text wins, comment included. Blank texts are never
/// stored.
#[derive(Clone, Debug, Serialize)]
pub struct Category {
    name: String,
    #[serde(serialize_with = "serialize_patterns")]
    patterns: IndexMap<String, Pattern>,
}

impl Category {
    /// Create an empty category after validating its name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_category_name(&name)?;
        Ok(Self {
            name,
            patterns: IndexMap::new(),
        })
    }

    /// Create a category from patterns, dropping repeated texts.
    pub fn with_patterns(
        name: impl Into<String>,
        patterns: impl IntoIterator<Item = Pattern>,
    ) -> Result<Self> {
        let mut category = Self::new(name)?;
        category.extend(patterns);
        Ok(category)
    }

    /// The category name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a pattern unless its text is blank or already present.
    ///
    /// Returns `true` if the pattern was added.
    pub fn push(&mut self, pattern: Pattern) -> bool {
        if pattern.is_blank() || self.patterns.contains_key(pattern.text()) {
            return false;
        }
        self.patterns.insert(pattern.text().to_string(), pattern);
        true
    }

    /// Append every pattern, skipping texts already present. Returns the
    /// number of patterns added.
    pub fn extend(&mut self, patterns: impl IntoIterator<Item = Pattern>) -> usize {
        let mut added = 0;
        for pattern in patterns {
            if self.push(pattern) {
                added += 1;
            }
        }
        added
    }

    /// Returns `true` if a pattern with this exact text is present.
    pub fn contains(&self, text: &str) -> bool {
        self.patterns.contains_key(text)
    }

    /// Look up a pattern by its exact text.
    pub fn get(&self, text: &str) -> Option<&Pattern> {
        self.patterns.get(text)
    }

    /// Patterns in insertion order.
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.values()
    }

    /// Pattern texts in insertion order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    /// Consume the category, yielding its patterns in order.
    pub fn into_patterns(self) -> impl Iterator<Item = Pattern> {
        self.patterns.into_values()
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if the category holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

// IndexMap equality ignores order; category order is observable.
impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.patterns.values().eq(other.patterns.values())
    }
}

impl Eq for Category {}

fn serialize_patterns<S: Serializer>(
    patterns: &IndexMap<String, Pattern>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(patterns.values())
}
