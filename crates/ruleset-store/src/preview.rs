//! Preview of a pending commit as a unified diff.
//!
//! Uses the `similar` crate (Myers diff) over lines, with three lines of
//! context.

use std::fs;
use std::io;
use std::path::Path;

use similar::TextDiff;

use crate::error::{CommitError, Result};

/// Unified diff between the current content of `target` and `rendered`.
///
/// A missing target diffs as empty. Returns an empty string when nothing
/// would change.
pub fn preview(target: &Path, rendered: &str) -> Result<String> {
    let current = match fs::read(target) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(CommitError::Read {
                path: target.to_path_buf(),
                source,
            })
        }
    };

    if current == rendered {
        return Ok(String::new());
    }

    let old_label = target.display().to_string();
    let new_label = format!("{old_label} (merged)");
    let diff = TextDiff::from_lines(current.as_str(), rendered);
    Ok(diff
        .unified_diff()
        .context_radius(3)
        .header(&old_label, &new_label)
        .to_string())
}
