//! Durable storage of merged rule files.
//!
//! Committing a document is a two-phase operation:
//!
//! 1. **Backup**: if the target exists, its bytes are copied to
//!    `<target>.backup.<stamp>`, a new file that never replaces an earlier
//!    backup, and synced to disk.
//! 2. **Overwrite**: the rendered document is written to a temporary file
//!    beside the target and renamed over it.
//!
//! If phase 1 fails the target is left exactly as found. Phase 2 is a single
//! rename, so the target always holds either the old or the new content.
//! Callers are expected to serialize commits against the same target.
//!
//! # Modules
//!
//! - [`clock`]: monotonic [`BackupStamp`] generation
//! - [`backup`]: backup naming and [`list_backups`]
//! - [`writer`]: [`RuleFileWriter`], [`CommitOptions`], [`CommitReceipt`]
//! - [`preview`]: unified diff of a pending commit
//! - [`error`]: [`CommitError`]

pub mod backup;
pub mod clock;
pub mod error;
pub mod preview;
pub mod writer;

pub use backup::{backup_path, list_backups, Backup};
pub use clock::{BackupClock, BackupStamp};
pub use error::{CommitError, Result};
pub use preview::preview;
pub use writer::{commit, CommitOptions, CommitReceipt, RuleFileWriter};
