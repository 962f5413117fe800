use std::fs;
use std::path::{Path, PathBuf};

use ruleset_store::CommitOptions;
use serde::{Deserialize, Serialize};

use crate::error::{InstallError, InstallResult};

/// Where an install reads from and writes to.
///
/// Loaded from a TOML file such as:
///
/// ```toml
/// baseline = "rules/gitignore.toml"
/// user = "~local/gitignore.toml"
/// target = "out/gitignore.merged.toml"
///
/// [commit]
/// sync = true
/// skip_unchanged = true
/// ```
///
/// Relative paths are resolved against the directory holding the config
/// file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallConfig {
    pub baseline: PathBuf,
    pub user: Option<PathBuf>,
    pub target: PathBuf,
    pub commit: CommitOptions,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            baseline: PathBuf::from("gitignore.toml"),
            user: None,
            target: PathBuf::from("gitignore.merged.toml"),
            commit: CommitOptions::default(),
        }
    }
}

impl InstallConfig {
    /// Parse a config from TOML text. Paths are left as written.
    pub fn from_toml_str(source: &str) -> InstallResult<Self> {
        toml::from_str(source).map_err(|e| InstallError::Config(e.to_string()))
    }

    /// Load a config file and resolve its relative paths.
    pub fn load(path: &Path) -> InstallResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| InstallError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// Rebase every relative path onto `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        self.baseline = rebase(base, self.baseline);
        self.user = self.user.map(|p| rebase(base, p));
        self.target = rebase(base, self.target);
        self
    }
}

fn rebase(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
