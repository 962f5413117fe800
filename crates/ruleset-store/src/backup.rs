//! Backup naming and discovery.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::clock::BackupStamp;
use crate::error::{CommitError, Result};

/// Infix between the target file name and the stamp.
pub const BACKUP_INFIX: &str = ".backup.";

/// A backup copy of a target file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Backup {
    pub path: PathBuf,
    pub stamp: BackupStamp,
}

/// `<target>.backup.<stamp>`, in the target's directory.
pub fn backup_path(target: &Path, stamp: &BackupStamp) -> PathBuf {
    let mut name: OsString = target.file_name().map(OsString::from).unwrap_or_default();
    name.push(BACKUP_INFIX);
    name.push(stamp.to_string());
    target.with_file_name(name)
}

/// The directory holding `target` and its backups.
pub(crate) fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Backups of `target`, oldest first.
///
/// Files whose suffix is not a valid stamp are ignored. A missing directory
/// yields an empty list.
pub fn list_backups(target: &Path) -> Result<Vec<Backup>> {
    let Some(file_name) = target.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    let prefix = format!("{file_name}{BACKUP_INFIX}");
    let dir = parent_dir(target);

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(CommitError::Read {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CommitError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        let Some(stamp) = name
            .to_str()
            .and_then(|n| n.strip_prefix(&prefix))
            .and_then(BackupStamp::parse)
        else {
            continue;
        };
        backups.push(Backup {
            path: entry.path(),
            stamp,
        });
    }
    backups.sort_by_key(|b| b.stamp);
    Ok(backups)
}
