use std::fmt;
use std::io;
use std::path::PathBuf;

use ruleset_format::ParseError;
use serde::Serialize;
use thiserror::Error;

/// Which input a file plays in a merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceRole {
    /// The distributor-supplied defaults. Required.
    Baseline,
    /// The locally customised overrides. Optional.
    User,
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => f.write_str("baseline"),
            Self::User => f.write_str("user"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceErrorKind {
    #[error("could not read file: {0}")]
    Read(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A rule file that could not be loaded.
#[derive(Debug, Error)]
#[error("{role} rules {}: {kind}", .path.display())]
pub struct SourceError {
    pub role: SourceRole,
    pub path: PathBuf,
    #[source]
    pub kind: SourceErrorKind,
}

impl SourceError {
    /// The parse error, if the file was read but malformed.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match &self.kind {
            SourceErrorKind::Parse(err) => Some(err),
            SourceErrorKind::Read(_) => None,
        }
    }
}

/// A non-fatal problem recorded during a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub role: SourceRole,
    pub path: PathBuf,
    pub message: String,
}

impl From<&SourceError> for Diagnostic {
    fn from(err: &SourceError) -> Self {
        Self {
            role: err.role,
            path: err.path.clone(),
            message: err.kind.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rules {}: {}", self.role, self.path.display(), self.message)
    }
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("cannot merge without baseline: {0}")]
    Baseline(#[source] SourceError),

    #[error("commit failed: {0}")]
    Commit(#[from] ruleset_store::CommitError),

    #[error("could not read config {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type InstallResult<T> = Result<T, InstallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_display() {
        let err = SourceError {
            role: SourceRole::User,
            path: PathBuf::from("user.toml"),
            kind: SourceErrorKind::Parse(ParseError::MissingPatterns {
                category: "IDE".into(),
                location: None,
            }),
        };
        assert_eq!(
            err.to_string(),
            "user rules user.toml: category \"IDE\" has no `patterns` list"
        );
        assert!(err.parse_error().is_some());
    }

    #[test]
    fn diagnostic_from_source_error() {
        let err = SourceError {
            role: SourceRole::User,
            path: PathBuf::from("u.toml"),
            kind: SourceErrorKind::Read(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
        };
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.role, SourceRole::User);
        assert!(diag.message.contains("denied"));
        assert!(err.parse_error().is_none());
    }

    #[test]
    fn role_display() {
        assert_eq!(SourceRole::Baseline.to_string(), "baseline");
        assert_eq!(SourceRole::User.to_string(), "user");
    }
}
