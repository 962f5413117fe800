//! High-level SDK for ruleset.
//!
//! [`Installer`] runs the whole pipeline: parse the baseline, parse the
//! optional user file, merge, and commit the result with a backup of the
//! previous target. This is the main entry point for tools embedding
//! ruleset.
//!
//! Failure policy:
//!
//! - an unusable baseline aborts the run and nothing is written;
//! - an unusable user file is reported as a [`Diagnostic`] and the run
//!   continues with the baseline alone;
//! - a failed commit aborts the run with the target left as it was.

pub mod config;
pub mod error;
pub mod installer;

pub use config::InstallConfig;
pub use error::{Diagnostic, InstallError, InstallResult, SourceError, SourceErrorKind, SourceRole};
pub use installer::{load_rules, InstallOutcome, Installer};

// Re-export key types
pub use ruleset_merge::MergeReport;
pub use ruleset_store::{list_backups, Backup, CommitOptions, CommitReceipt};
pub use ruleset_types::{Category, Pattern, RuleDocument};
