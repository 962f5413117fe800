use serde::Serialize;

/// Summary of what a merge did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// `true` when no user document was supplied and the baseline was used as is.
    pub fallback: bool,
    /// Number of categories taken from the baseline.
    pub baseline_categories: usize,
    /// Names of categories that exist only in the user document, in order.
    pub user_categories: Vec<String>,
    /// Patterns appended to categories present in both documents.
    pub appended: usize,
    /// User patterns dropped because their text was already present.
    pub skipped_duplicates: usize,
}

impl MergeReport {
    /// A report for the baseline-only path.
    pub fn fallback(baseline_categories: usize) -> Self {
        Self {
            fallback: true,
            baseline_categories,
            ..Self::default()
        }
    }

    /// Returns `true` if the user document added nothing.
    pub fn is_noop(&self) -> bool {
        self.user_categories.is_empty() && self.appended == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_report() {
        let r = MergeReport::fallback(3);
        assert!(r.fallback);
        assert_eq!(r.baseline_categories, 3);
        assert!(r.is_noop());
    }

    #[test]
    fn appended_is_not_noop() {
        let r = MergeReport {
            appended: 1,
            ..MergeReport::default()
        };
        assert!(!r.is_noop());
    }
}
