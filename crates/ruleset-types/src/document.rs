//! The top-level parsed unit.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::category::Category;
use crate::error::{Result, TypeError};

/// Categories keyed by name, in declaration order.
///
/// Two documents are equal when they hold the same categories in the same
/// order with the same patterns in the same order. A document never holds an
/// empty category: [`RuleDocument::insert`] declines them.
#[derive(Clone, Debug, Default)]
pub struct RuleDocument {
    categories: IndexMap<String, Category>,
}

impl RuleDocument {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from categories, failing on a repeated name.
    /// Empty categories are skipped.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Result<Self> {
        let mut document = Self::new();
        for category in categories {
            document.insert(category)?;
        }
        Ok(document)
    }

    /// Append a category after the existing ones.
    ///
    /// Returns `Ok(false)` without adding anything when the category has no
    /// patterns, and an error if a category with the same name exists.
    pub fn insert(&mut self, category: Category) -> Result<bool> {
        if self.categories.contains_key(category.name()) {
            return Err(TypeError::DuplicateCategory(category.name().to_string()));
        }
        if category.is_empty() {
            return Ok(false);
        }
        self.categories.insert(category.name().to_string(), category);
        Ok(true)
    }

    /// Look up a category by name.
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    /// Mutable access to an existing category. Categories only grow through
    /// this handle, so the non-empty invariant holds.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.get_mut(name)
    }

    /// Returns `true` if a category with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Category names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` if the document holds no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of patterns across all categories.
    pub fn pattern_count(&self) -> usize {
        self.categories.values().map(Category::len).sum()
    }
}

impl IntoIterator for RuleDocument {
    type Item = Category;
    type IntoIter = indexmap::map::IntoValues<String, Category>;

    /// Categories in declaration order.
    fn into_iter(self) -> Self::IntoIter {
        self.categories.into_values()
    }
}

impl PartialEq for RuleDocument {
    fn eq(&self, other: &Self) -> bool {
        self.categories.values().eq(other.categories.values())
    }
}

impl Eq for RuleDocument {}

impl Serialize for RuleDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.categories.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pattern;

    fn category(name: &str, patterns: &[&str]) -> Category {
        Category::with_patterns(name, patterns.iter().map(|p| Pattern::new(*p))).unwrap()
    }

    #[test]
    fn preserves_declaration_order() {
        let doc = RuleDocument::from_categories([
            category("Python", &["__pycache__/"]),
            category("IDE", &[".idea/"]),
            category("Go", &["vendor/"]),
        ])
        .unwrap();
        assert_eq!(doc.names().collect::<Vec<_>>(), vec!["Python", "IDE", "Go"]);
        assert_eq!(doc.pattern_count(), 3);
    }

    #[test]
    fn empty_category_is_declined() {
        let mut doc = RuleDocument::new();
        assert!(!doc.insert(Category::new("Empty").unwrap()).unwrap());
        assert!(doc.is_empty());
        assert!(!doc.contains("Empty"));
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let mut doc = RuleDocument::new();
        doc.insert(category("IDE", &[".idea/"])).unwrap();
        let err = doc.insert(category("IDE", &[".vscode/"])).unwrap_err();
        assert_eq!(err, TypeError::DuplicateCategory("IDE".into()));
        assert_eq!(doc.get("IDE").unwrap().len(), 1);
    }

    #[test]
    fn get_mut_appends() {
        let mut doc = RuleDocument::from_categories([category("IDE", &[".idea/"])]).unwrap();
        doc.get_mut("IDE").unwrap().push(Pattern::new(".vscode/"));
        assert_eq!(doc.get("IDE").unwrap().len(), 2);
    }

    #[test]
    fn into_iter_keeps_order() {
        let doc = RuleDocument::from_categories([category("B", &["b"]), category("A", &["a"])]).unwrap();
        let names: Vec<String> = doc.into_iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = RuleDocument::from_categories([category("A", &["a"]), category("B", &["b"])]).unwrap();
        let b = RuleDocument::from_categories([category("B", &["b"]), category("A", &["a"])]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn serializes_as_category_list() {
        let doc = RuleDocument::from_categories([category("Rust", &["target/"])]).unwrap();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json[0]["name"], "Rust");
        assert_eq!(json[0]["patterns"][0]["text"], "target/");
    }
}
