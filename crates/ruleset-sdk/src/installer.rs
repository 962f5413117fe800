use std::fs;
use std::io;
use std::path::Path;

use ruleset_merge::{merge_with_report, MergeReport};
use ruleset_store::{preview, CommitReceipt, RuleFileWriter};
use ruleset_types::RuleDocument;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::InstallConfig;
use crate::error::{
    Diagnostic, InstallError, InstallResult, SourceError, SourceErrorKind, SourceRole,
};

/// Read and parse one rule file.
pub fn load_rules(role: SourceRole, path: &Path) -> Result<RuleDocument, SourceError> {
    let wrap = |kind| SourceError {
        role,
        path: path.to_path_buf(),
        kind,
    };
    let source = fs::read_to_string(path).map_err(|e| wrap(SourceErrorKind::Read(e)))?;
    let document = ruleset_format::parse(&source).map_err(|e| wrap(SourceErrorKind::Parse(e)))?;
    debug!(
        %role,
        path = %path.display(),
        categories = document.len(),
        patterns = document.pattern_count(),
        "loaded rules"
    );
    Ok(document)
}

/// Result of a run.
#[derive(Clone, Debug, Serialize)]
pub struct InstallOutcome {
    /// The merged document.
    pub document: RuleDocument,
    pub report: MergeReport,
    /// Set when the document was committed.
    pub receipt: Option<CommitReceipt>,
    /// Set on a dry run: unified diff from the current target to the merged
    /// rendering. Empty if nothing would change.
    pub preview: Option<String>,
    /// Problems that did not stop the run.
    pub diagnostics: Vec<Diagnostic>,
}

impl InstallOutcome {
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Runs load, merge, and commit for one [`InstallConfig`].
pub struct Installer {
    config: InstallConfig,
    writer: RuleFileWriter,
}

impl Installer {
    pub fn new(config: InstallConfig) -> Self {
        let writer = RuleFileWriter::new(config.commit.clone());
        Self { config, writer }
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// Merge and commit to the configured target.
    pub fn run(&self) -> InstallResult<InstallOutcome> {
        let mut outcome = self.plan()?;
        let receipt = self.writer.commit(&outcome.document, &self.config.target)?;
        outcome.receipt = Some(receipt);
        Ok(outcome)
    }

    /// Merge and diff against the configured target without writing.
    pub fn dry_run(&self) -> InstallResult<InstallOutcome> {
        let mut outcome = self.plan()?;
        let rendered = ruleset_format::render(&outcome.document);
        outcome.preview = Some(preview(&self.config.target, &rendered)?);
        Ok(outcome)
    }

    /// Load both inputs and merge them.
    fn plan(&self) -> InstallResult<InstallOutcome> {
        let baseline =
            load_rules(SourceRole::Baseline, &self.config.baseline).map_err(InstallError::Baseline)?;

        let mut diagnostics = Vec::new();
        let user = match self.load_user() {
            Ok(user) => user,
            Err(err) => {
                warn!(%err, "ignoring user rules; continuing with baseline only");
                diagnostics.push(Diagnostic::from(&err));
                None
            }
        };

        let (document, report) = merge_with_report(baseline, user);
        info!(
            categories = document.len(),
            patterns = document.pattern_count(),
            appended = report.appended,
            new_categories = report.user_categories.len(),
            fallback = report.fallback,
            "merged rules"
        );
        Ok(InstallOutcome {
            document,
            report,
            receipt: None,
            preview: None,
            diagnostics,
        })
    }

    /// The user document, or `None` if none is configured or the file does
    /// not exist.
    fn load_user(&self) -> Result<Option<RuleDocument>, SourceError> {
        let Some(path) = &self.config.user else {
            return Ok(None);
        };
        match load_rules(SourceRole::User, path) {
            Ok(document) => Ok(Some(document)),
            Err(SourceError {
                kind: SourceErrorKind::Read(e),
                ..
            }) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no user rules found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
