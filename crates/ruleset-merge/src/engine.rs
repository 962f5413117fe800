//! Baseline/user merge.
//!
//! Rules, per category key:
//!
//! - only in the baseline: carried unchanged;
//! - only in the user document: carried unchanged, appended after all
//!   baseline categories in user order;
//! - in both: baseline patterns first in their order, then user patterns in
//!   their order, skipping any whose text is already present.
//!
//! A pattern keeps the comment of the occurrence that was emitted. The merge
//! is total: given two documents it always produces one.

use ruleset_types::RuleDocument;
use tracing::{debug, warn};

use crate::report::MergeReport;

/// Merge `user` into `baseline`.
///
/// With no user document the baseline is returned unchanged.
pub fn merge(baseline: RuleDocument, user: Option<RuleDocument>) -> RuleDocument {
    merge_with_report(baseline, user).0
}

/// Merge `user` into `baseline`, also returning a summary of the changes.
pub fn merge_with_report(
    baseline: RuleDocument,
    user: Option<RuleDocument>,
) -> (RuleDocument, MergeReport) {
    let Some(user) = user else {
        debug!(categories = baseline.len(), "no user rules; using baseline as is");
        let report = MergeReport::fallback(baseline.len());
        return (baseline, report);
    };

    let mut merged = baseline;
    let mut report = MergeReport {
        baseline_categories: merged.len(),
        ..MergeReport::default()
    };

    for category in user {
        let Some(existing) = merged.get_mut(category.name()) else {
            let name = category.name().to_string();
            match merged.insert(category) {
                Ok(true) => {
                    debug!(category = %name, "added user category");
                    report.user_categories.push(name);
                }
                Ok(false) => debug!(category = %name, "skipping empty user category"),
                Err(err) => warn!(category = %name, %err, "skipping user category"),
            }
            continue;
        };

        let mut appended = 0;
        for pattern in category.into_patterns() {
            if existing.contains(pattern.text()) {
                debug!(
                    category = existing.name(),
                    pattern = pattern.text(),
                    "skipping duplicate user pattern"
                );
                report.skipped_duplicates += 1;
            } else {
                existing.push(pattern);
                appended += 1;
            }
        }
        debug!(category = existing.name(), appended, total = existing.len(), "merged category");
        report.appended += appended;
    }

    debug!(
        categories = merged.len(),
        appended = report.appended,
        skipped = report.skipped_duplicates,
        "merge complete"
    );
    (merged, report)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use proptest::prelude::*;
    use ruleset_types::{Category, Pattern};

    fn category(name: &str, patterns: &[&str]) -> Category {
        Category::with_patterns(name, patterns.iter().map(|p| Pattern::new(*p))).unwrap()
    }

    fn doc(categories: Vec<Category>) -> RuleDocument {
        RuleDocument::from_categories(categories).unwrap()
    }

    fn texts<'a>(doc: &'a RuleDocument, name: &str) -> Vec<&'a str> {
        doc.get(name).unwrap().texts().collect()
    }

    #[test]
    fn ide_scenario() {
        let baseline = doc(vec![category("IDE", &[".idea/", ".vscode/"])]);
        let user = doc(vec![Category::with_patterns(
            "IDE",
            [Pattern::new(".vscode/"), Pattern::with_comment(".atom/", "Atom editor")],
        )
        .unwrap()]);

        let (merged, report) = merge_with_report(baseline, Some(user));
        assert_eq!(texts(&merged, "IDE"), vec![".idea/", ".vscode/", ".atom/"]);
        let atom = merged.get("IDE").unwrap().get(".atom/").unwrap();
        assert_eq!(atom.comment(), Some("Atom editor"));
        assert_eq!(report.appended, 1);
        assert_eq!(report.skipped_duplicates, 1);
    }

    #[test]
    fn baseline_comment_wins_on_duplicate() {
        let baseline = doc(vec![Category::with_patterns(
            "Logs_Tmp",
            [Pattern::with_comment("*.log", "distributor")],
        )
        .unwrap()]);
        let user = doc(vec![Category::with_patterns(
            "Logs_Tmp",
            [Pattern::with_comment("*.log", "mine")],
        )
        .unwrap()]);

        let merged = merge(baseline, Some(user));
        let log = merged.get("Logs_Tmp").unwrap().get("*.log").unwrap();
        assert_eq!(log.comment(), Some("distributor"));
    }

    #[test]
    fn category_order_baseline_then_user_only() {
        let baseline = doc(vec![category("Python", &["*.pyc"]), category("Go", &["vendor/"])]);
        let user = doc(vec![
            category("Team", &["scratch/"]),
            category("Go", &["*.test"]),
            category("Local", &[".env.local"]),
        ]);

        let (merged, report) = merge_with_report(baseline, Some(user));
        assert_eq!(
            merged.names().collect::<Vec<_>>(),
            vec!["Python", "Go", "Team", "Local"]
        );
        assert_eq!(texts(&merged, "Go"), vec!["vendor/", "*.test"]);
        assert_eq!(report.user_categories, vec!["Team", "Local"]);
        assert_eq!(report.baseline_categories, 2);
    }

    #[test]
    fn baseline_only_categories_are_untouched() {
        let baseline = doc(vec![category("Rust", &["target/", "**/*.rs.bk"])]);
        let user = doc(vec![category("IDE", &[".idea/"])]);
        let merged = merge(baseline.clone(), Some(user));
        assert_eq!(merged.get("Rust"), baseline.get("Rust"));
    }

    #[test]
    fn fallback_is_identity() {
        let baseline = doc(vec![category("IDE", &[".idea/"]), category("Go", &["vendor/"])]);
        let (merged, report) = merge_with_report(baseline.clone(), None);
        assert_eq!(merged, baseline);
        assert!(report.fallback);
    }

    #[test]
    fn empty_user_document() {
        let baseline = doc(vec![category("IDE", &[".idea/"])]);
        let (merged, report) = merge_with_report(baseline.clone(), Some(RuleDocument::new()));
        assert_eq!(merged, baseline);
        assert!(!report.fallback);
        assert!(report.is_noop());
    }

    #[test]
    fn empty_baseline_takes_user() {
        let user = doc(vec![category("IDE", &[".idea/"])]);
        let merged = merge(RuleDocument::new(), Some(user.clone()));
        assert_eq!(merged, user);
    }

    #[test]
    fn user_duplicates_are_removed_not_baseline() {
        let baseline = doc(vec![category("A", &["x", "y"])]);
        let user = doc(vec![category("A", &["y", "z", "x"])]);
        let merged = merge(baseline, Some(user));
        assert_eq!(texts(&merged, "A"), vec!["x", "y", "z"]);
    }

    fn document_strategy() -> impl Strategy<Value = RuleDocument> {
        let pattern = ("[a-e]{1,2}", proptest::option::of("[a-z]{1,3}"))
            .prop_map(|(text, comment)| Pattern::annotated(text, comment.as_deref()));
        proptest::collection::vec(
            ("[A-D]", proptest::collection::vec(pattern, 0..6)),
            0..5,
        )
        .prop_map(|entries| {
            let mut doc = RuleDocument::new();
            for (name, patterns) in entries {
                if doc.contains(&name) {
                    continue;
                }
                doc.insert(Category::with_patterns(name, patterns).unwrap())
                    .unwrap();
            }
            doc
        })
    }

    fn text_set(doc: &RuleDocument, name: &str) -> BTreeSet<String> {
        doc.get(name)
            .map(|c| c.texts().map(str::to_string).collect())
            .unwrap_or_default()
    }

    proptest! {
        #[test]
        fn remerge_is_idempotent(a in document_strategy(), b in document_strategy()) {
            let once = merge(a, Some(b.clone()));
            let twice = merge(once.clone(), Some(b));
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn fallback_equivalence(a in document_strategy()) {
            prop_assert_eq!(merge(a.clone(), None), a);
        }

        #[test]
        fn union_without_duplicates(a in document_strategy(), b in document_strategy()) {
            let merged = merge(a.clone(), Some(b.clone()));
            for category in merged.categories() {
                let name = category.name();
                let union: BTreeSet<String> =
                    text_set(&a, name).union(&text_set(&b, name)).cloned().collect();
                let emitted: Vec<&str> = category.texts().collect();
                let distinct: BTreeSet<&str> = emitted.iter().copied().collect();
                prop_assert_eq!(emitted.len(), distinct.len());
                prop_assert_eq!(emitted.len(), union.len());
            }
        }

        #[test]
        fn nothing_is_lost(a in document_strategy(), b in document_strategy()) {
            let merged = merge(a.clone(), Some(b.clone()));
            for name in a.names().chain(b.names()) {
                prop_assert!(merged.contains(name));
            }
            for category in a.categories() {
                let out = merged.get(category.name()).unwrap();
                for pattern in category.patterns() {
                    prop_assert_eq!(out.get(pattern.text()), Some(pattern));
                }
            }
            let baseline_names: Vec<&str> = a.names().collect();
            let prefix: Vec<&str> = merged.names().take(baseline_names.len()).collect();
            prop_assert_eq!(prefix, baseline_names);
        }
    }
}
