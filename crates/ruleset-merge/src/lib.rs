//! Merge engine for ruleset.
//!
//! Combines a distributor baseline with an optional user document into one
//! [`RuleDocument`](ruleset_types::RuleDocument): a category-scoped union in
//! which baseline patterns keep their order and position and user patterns
//! with new text are appended after them.

pub mod engine;
pub mod report;

pub use engine::{merge, merge_with_report};
pub use report::MergeReport;
