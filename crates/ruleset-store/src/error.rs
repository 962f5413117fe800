//! Error types for committing rule files.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while committing a rule file.
///
/// Every variant is raised before the target is replaced, so on error the
/// target still holds its previous content.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The existing target could not be copied to a backup.
    #[error("could not back up {}: {source}", .target.display())]
    Backup { target: PathBuf, source: io::Error },

    /// Every backup name tried was already taken.
    #[error("no free backup name for {}", .target.display())]
    BackupCollision { target: PathBuf },

    /// The parent directory of the target could not be created.
    #[error("could not create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    /// The new content could not be written or moved into place.
    #[error("could not write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// A file or directory could not be read.
    #[error("could not read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
}

/// Convenience alias for commit results.
pub type Result<T> = std::result::Result<T, CommitError>;
