use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use ruleset_format::render;
use ruleset_types::RuleDocument;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::backup::{backup_path, parent_dir};
use crate::clock::BackupClock;
use crate::error::{CommitError, Result};

/// How many stamps to try before giving up on a free backup name.
const MAX_BACKUP_ATTEMPTS: usize = 16;

/// Commit behaviour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitOptions {
    /// `fsync` the backup and the new content before the rename.
    pub sync: bool,
    /// Create missing parent directories of the target.
    pub create_parent_dirs: bool,
    /// Leave the target alone (no backup, no write) when it already holds
    /// exactly the content being committed.
    pub skip_unchanged: bool,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            sync: true,
            create_parent_dirs: true,
            skip_unchanged: false,
        }
    }
}

/// What a commit did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitReceipt {
    /// The file that was written.
    pub target: PathBuf,
    /// Where the previous content was saved, if the target existed.
    pub backup: Option<PathBuf>,
    /// Size of the committed content.
    pub bytes_written: u64,
    /// BLAKE3 digest of the committed content, hex encoded.
    pub digest: String,
    /// `true` if the target already held this content and was not touched.
    pub unchanged: bool,
}

/// Writes rule documents to disk with backup-then-overwrite ordering.
pub struct RuleFileWriter {
    options: CommitOptions,
    clock: &'static BackupClock,
}

impl RuleFileWriter {
    pub fn new(options: CommitOptions) -> Self {
        Self {
            options,
            clock: BackupClock::process(),
        }
    }

    /// Render `document` and commit it to `target`.
    pub fn commit(&self, document: &RuleDocument, target: &Path) -> Result<CommitReceipt> {
        let rendered = render(document);
        self.commit_bytes(rendered.as_bytes(), target)
    }

    /// Commit raw content to `target`.
    ///
    /// If the target exists it is first copied to a fresh backup with the
    /// target's permissions; any failure up to that point leaves the target
    /// untouched. The content is then written to a temporary file in the same
    /// directory and renamed over the target, keeping its permissions. If
    /// that fails the new backup is removed again.
    pub fn commit_bytes(&self, content: &[u8], target: &Path) -> Result<CommitReceipt> {
        let digest = hex::encode(blake3::hash(content).as_bytes());
        let dir = parent_dir(target);

        if self.options.create_parent_dirs && !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| CommitError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
            debug!(dir = %dir.display(), "created target directory");
        }

        let mut backup = None;
        let mut permissions = None;
        if let Some((current, perms)) = read_existing(target)? {
            if self.options.skip_unchanged && current == content {
                info!(target = %target.display(), "target already up to date");
                return Ok(CommitReceipt {
                    target: target.to_path_buf(),
                    backup: None,
                    bytes_written: 0,
                    digest,
                    unchanged: true,
                });
            }
            backup = Some(self.write_backup(target, &current, &perms)?);
            permissions = Some(perms);
        }

        self.install(target, dir, content, permissions, backup.as_deref())?;

        info!(
            target = %target.display(),
            backup = ?backup,
            bytes = content.len(),
            "committed rule file"
        );
        Ok(CommitReceipt {
            target: target.to_path_buf(),
            backup,
            bytes_written: content.len() as u64,
            digest,
            unchanged: false,
        })
    }

    /// Copy `current` into a new backup file beside `target`.
    fn write_backup(
        &self,
        target: &Path,
        current: &[u8],
        permissions: &Permissions,
    ) -> Result<PathBuf> {
        for _ in 0..MAX_BACKUP_ATTEMPTS {
            let path = backup_path(target, &self.clock.now());
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "backup name taken; retrying");
                    continue;
                }
                Err(source) => {
                    return Err(CommitError::Backup {
                        target: target.to_path_buf(),
                        source,
                    })
                }
            };

            let written = file
                .set_permissions(permissions.clone())
                .and_then(|()| self.write_synced(&mut file, current));
            if let Err(source) = written {
                drop(file);
                // Never leave a partial backup behind.
                let _ = fs::remove_file(&path);
                return Err(CommitError::Backup {
                    target: target.to_path_buf(),
                    source,
                });
            }
            debug!(path = %path.display(), bytes = current.len(), "wrote backup");
            return Ok(path);
        }
        Err(CommitError::BackupCollision {
            target: target.to_path_buf(),
        })
    }

    /// Replace `target`, removing `backup` again if that fails.
    fn install(
        &self,
        target: &Path,
        dir: &Path,
        content: &[u8],
        permissions: Option<Permissions>,
        backup: Option<&Path>,
    ) -> Result<()> {
        let result = self.replace(target, dir, content, permissions);
        if let (Err(err), Some(backup)) = (&result, backup) {
            match fs::remove_file(backup) {
                Ok(()) => debug!(path = %backup.display(), "removed backup of failed commit"),
                Err(e) => warn!(
                    path = %backup.display(),
                    error = %e,
                    commit_error = %err,
                    "could not remove backup of failed commit"
                ),
            }
        }
        result
    }

    /// Atomically replace `target` with `content`.
    fn replace(
        &self,
        target: &Path,
        dir: &Path,
        content: &[u8],
        permissions: Option<Permissions>,
    ) -> Result<()> {
        let write_err = |source| CommitError::Write {
            path: target.to_path_buf(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        self.write_synced(tmp.as_file_mut(), content)
            .map_err(write_err)?;
        if let Some(permissions) = permissions {
            fs::set_permissions(tmp.path(), permissions).map_err(write_err)?;
        }
        tmp.persist(target).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    fn write_synced(&self, file: &mut File, content: &[u8]) -> io::Result<()> {
        file.write_all(content)?;
        file.flush()?;
        if self.options.sync {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl Default for RuleFileWriter {
    fn default() -> Self {
        Self::new(CommitOptions::default())
    }
}

/// Commit `document` to `target` with default options.
pub fn commit(document: &RuleDocument, target: &Path) -> Result<CommitReceipt> {
    RuleFileWriter::default().commit(document, target)
}

/// Read the current target, if there is one, along with its permissions.
fn read_existing(target: &Path) -> Result<Option<(Vec<u8>, Permissions)>> {
    let backup_err = |source| CommitError::Backup {
        target: target.to_path_buf(),
        source,
    };

    let mut file = match File::open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(backup_err(e)),
    };
    let permissions = file.metadata().map_err(backup_err)?.permissions();
    let mut current = Vec::new();
    file.read_to_end(&mut current).map_err(backup_err)?;
    Ok(Some((current, permissions)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::list_backups;
    use ruleset_format::parse;
    use ruleset_types::{Category, Pattern};

    fn document(patterns: &[&str]) -> RuleDocument {
        RuleDocument::from_categories([Category::with_patterns(
            "IDE",
            patterns.iter().map(|p| Pattern::new(*p)),
        )
        .unwrap()])
        .unwrap()
    }

    #[test]
    fn commit_new_target_takes_no_backup() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rules.toml");
        let doc = document(&[".idea/"]);

        let receipt = commit(&doc, &target).unwrap();
        assert!(receipt.backup.is_none());
        assert!(!receipt.unchanged);
        assert_eq!(fs::read_to_string(&target).unwrap(), render(&doc));
        assert_eq!(receipt.bytes_written, render(&doc).len() as u64);
        assert!(list_backups(&target).unwrap().is_empty());
    }

    #[test]
    fn commit_existing_target_backs_up_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rules.toml");
        let original = b"# hand edited\r\n[IDE]\npatterns = [\"x\"]   \n";
        fs::write(&target, original).unwrap();

        let doc = document(&[".idea/", ".vscode/"]);
        let receipt = commit(&doc, &target).unwrap();

        let backups = list_backups(&target).unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(Some(&backups[0].path), receipt.backup.as_ref());
        assert_eq!(fs::read(&backups[0].path).unwrap(), original);
        assert_eq!(parse(&fs::read_to_string(&target).unwrap()).unwrap(), doc);
    }

    #[test]
    fn repeated_commits_never_overwrite_backups() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rules.toml");
        fs::write(&target, b"v0").unwrap();

        let writer = RuleFileWriter::default();
        writer.commit_bytes(b"v1", &target).unwrap();
        writer.commit_bytes(b"v2", &target).unwrap();
        writer.commit_bytes(b"v3", &target).unwrap();

        let contents: Vec<Vec<u8>> = list_backups(&target)
            .unwrap()
            .iter()
            .map(|b| fs::read(&b.path).unwrap())
            .collect();
        assert_eq!(contents, vec![b"v0".to_vec(), b"v1".to_vec(), b"v2".to_vec()]);
        assert_eq!(fs::read(&target).unwrap(), b"v3");
    }

    #[test]
    fn skip_unchanged_leaves_target_alone() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rules.toml");
        let doc = document(&["a"]);
        let writer = RuleFileWriter::new(CommitOptions {
            skip_unchanged: true,
            ..CommitOptions::default()
        });

        writer.commit(&doc, &target).unwrap();
        let receipt = writer.commit(&doc, &target).unwrap();
        assert!(receipt.unchanged);
        assert!(receipt.backup.is_none());
        assert!(list_backups(&target).unwrap().is_empty());
    }

    #[test]
    fn unchanged_content_is_still_backed_up_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rules.toml");
        let doc = document(&["a"]);
        commit(&doc, &target).unwrap();
        let receipt = commit(&doc, &target).unwrap();
        assert!(receipt.backup.is_some());
        assert_eq!(list_backups(&target).unwrap().len(), 1);
    }

    #[test]
    fn unreadable_target_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rules.toml");
        fs::create_dir(&target).unwrap();

        let err = commit(&document(&["a"]), &target).unwrap_err();
        assert!(matches!(err, CommitError::Backup { .. }));
        assert!(target.is_dir());
        assert!(list_backups(&target).unwrap().is_empty());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b").join("rules.toml");
        commit(&document(&["a"]), &target).unwrap();
        assert!(target.is_file());
    }

    #[test]
    fn missing_parent_without_create_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("rules.toml");
        let writer = RuleFileWriter::new(CommitOptions {
            create_parent_dirs: false,
            ..CommitOptions::default()
        });
        let err = writer.commit(&document(&["a"]), &target).unwrap_err();
        assert!(matches!(err, CommitError::Write { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn digest_matches_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rules.toml");
        let receipt = RuleFileWriter::default().commit_bytes(b"abc", &target).unwrap();
        assert_eq!(receipt.digest, hex::encode(blake3::hash(b"abc").as_bytes()));
        assert_eq!(receipt.digest.len(), 64);
    }

    #[test]
    fn failed_replace_removes_new_backup() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rules.toml");
        fs::write(&target, b"old").unwrap();
        let perms = fs::metadata(&target).unwrap().permissions();

        let writer = RuleFileWriter::default();
        let backup = writer.write_backup(&target, b"old", &perms).unwrap();
        assert!(backup.is_file());

        // No temporary file can be created in a missing directory.
        let missing = dir.path().join("missing");
        let err = writer
            .install(&target, &missing, b"new", Some(perms), Some(&backup))
            .unwrap_err();
        assert!(matches!(err, CommitError::Write { .. }));
        assert!(!backup.exists());
        assert_eq!(fs::read(&target).unwrap(), b"old");
        assert!(list_backups(&target).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn backup_keeps_target_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rules.toml");
        fs::write(&target, b"secret").unwrap();
        fs::set_permissions(&target, Permissions::from_mode(0o600)).unwrap();

        let receipt = RuleFileWriter::default().commit_bytes(b"new", &target).unwrap();
        let backup = receipt.backup.unwrap();
        let mode = fs::metadata(&backup).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(fs::read(&backup).unwrap(), b"secret");
    }

    #[cfg(unix)]
    #[test]
    fn keeps_target_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("rules.toml");
        fs::write(&target, b"old").unwrap();
        fs::set_permissions(&target, Permissions::from_mode(0o640)).unwrap();

        RuleFileWriter::default().commit_bytes(b"new", &target).unwrap();
        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
