//! Text to [`RuleDocument`].

use std::ops::Range;

use ruleset_types::{Category, Pattern, RuleDocument};
use toml_edit::{Array, ImDocument, Item, RawString, Value};
use tracing::debug;

use crate::error::{Location, ParseError, Result};
use crate::PATTERNS_KEY;

/// Parse a rule file.
///
/// Categories keep their declaration order and patterns their list order.
/// A pattern text repeated within one category keeps its first occurrence,
/// blank patterns are skipped, and categories with no patterns are left out
/// of the result. Structural errors carry the location of the offending key
/// or value.
pub fn parse(source: &str) -> Result<RuleDocument> {
    let toml = ImDocument::parse(source).map_err(|e| ParseError::from_toml(source, &e))?;
    let parser = Parser { source };

    let mut document = RuleDocument::new();
    let table = toml.as_table();
    for (name, item) in table.iter() {
        let span = table.key(name).and_then(|key| key.span());
        let location = parser.locate(span.or_else(|| item.span()));
        let category = parser.category(name, item, location)?;
        if !document.insert(category)? {
            debug!(category = name, "dropping empty category");
        }
    }

    debug!(
        categories = document.len(),
        patterns = document.pattern_count(),
        "parsed rule document"
    );
    Ok(document)
}

/// Walks a spanned document, resolving spans and decor against `source`.
struct Parser<'s> {
    source: &'s str,
}

impl<'s> Parser<'s> {
    fn locate(&self, span: Option<Range<usize>>) -> Option<Location> {
        span.map(|span| Location::at_offset(self.source, span.start))
    }

    fn category(&self, name: &str, item: &Item, location: Option<Location>) -> Result<Category> {
        let table = item.as_table_like().ok_or_else(|| ParseError::NotATable {
            category: name.to_string(),
            found: item.type_name().to_string(),
            location: self.locate(item.span()).or(location),
        })?;

        let mut patterns = None;
        for (key, value) in table.iter() {
            if key != PATTERNS_KEY {
                let key_span = table.get_key_value(key).and_then(|(k, _)| k.span());
                return Err(ParseError::UnknownKey {
                    category: name.to_string(),
                    key: key.to_string(),
                    location: self.locate(key_span.or_else(|| value.span())),
                });
            }
            patterns = Some(value);
        }
        let patterns = patterns.ok_or_else(|| ParseError::MissingPatterns {
            category: name.to_string(),
            location,
        })?;
        let array = patterns
            .as_array()
            .ok_or_else(|| ParseError::PatternsNotArray {
                category: name.to_string(),
                found: patterns.type_name().to_string(),
                location: self.locate(patterns.span()),
            })?;

        let closing = self
            .closing_comment(name, patterns)
            .or_else(|| self.closing_comment(name, item));

        let mut category = Category::new(name)?;
        let values: Vec<&Value> = array.iter().collect();
        for (index, value) in values.iter().enumerate() {
            let text = value.as_str().ok_or_else(|| ParseError::PatternNotString {
                category: name.to_string(),
                index,
                found: value.type_name().to_string(),
                location: self.locate(value.span()),
            })?;
            let mut comment = self.line_comment(&values, index, array);
            if index + 1 == values.len() {
                comment = comment.or(closing);
            }
            let pattern = Pattern::annotated(text, comment);
            if pattern.is_blank() {
                debug!(category = name, index, "dropping blank pattern");
            } else if !category.push(pattern) {
                debug!(category = name, pattern = text, "dropping repeated pattern");
            }
        }
        Ok(category)
    }

    /// The comment written on the same line as element `index`.
    ///
    /// toml_edit keeps whitespace and comments between elements as decor: the
    /// run after a comma belongs to the next element's prefix, and the run
    /// after the final comma is the array's trailing decor. A comment placed
    /// before the comma (only possible on the last element) lands in the
    /// suffix.
    fn line_comment<'a>(
        &'a self,
        values: &[&'a Value],
        index: usize,
        array: &'a Array,
    ) -> Option<&'a str> {
        self.first_line_comment(values[index].decor().suffix())
            .or_else(|| match values.get(index + 1) {
                Some(next) => self.first_line_comment(next.decor().prefix()),
                None => self.first_line_comment(Some(array.trailing())),
            })
    }

    /// A comment after the closing bracket or brace of `item`.
    ///
    /// It belongs to the last pattern only when `item` fits on one line;
    /// after a multi-line list it sits on a line of its own and is dropped.
    fn closing_comment<'a>(&'a self, name: &str, item: &'a Item) -> Option<&'a str> {
        let value = item.as_value()?;
        let comment = self.first_line_comment(value.decor().suffix())?;
        let one_line = value
            .span()
            .and_then(|span| self.source.get(span))
            .is_some_and(|text| !text.contains('\n'));
        if one_line {
            Some(comment)
        } else {
            debug!(category = name, comment, "dropping comment after multi-line list");
            None
        }
    }

    fn first_line_comment<'a>(&'a self, raw: Option<&'a RawString>) -> Option<&'a str> {
        let raw = self.raw(raw?)?;
        let first_line = raw.split('\n').next().unwrap_or_default();
        first_line
            .trim_start()
            .strip_prefix('#')
            .map(|comment| comment.trim_end_matches('\r'))
    }

    /// Decor text; parsed documents hold it as a span into the source.
    fn raw<'a>(&'a self, raw: &'a RawString) -> Option<&'a str> {
        raw.as_str()
            .or_else(|| raw.span().and_then(|span| self.source.get(span)))
    }
}
