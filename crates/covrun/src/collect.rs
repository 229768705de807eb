//! Locating coverage profiles written by the test run

use crate::error::{CovError, CovResult};
use std::path::{Path, PathBuf};

/// Find profiles named `profile_name` directly inside `dir`
///
/// No match is not an error: an empty list is handed on to the merger,
/// which produces an empty report. `profile_name` may itself be a glob
/// pattern; `dir` is matched literally.
///
/// # Errors
///
/// Returns [`CovError::Glob`] if the pattern is invalid or a match cannot
/// be read.
pub fn collect_profiles(dir: &Path, profile_name: &str) -> CovResult<Vec<PathBuf>> {
    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped_dir).join(profile_name);
    let pattern = pattern.to_string_lossy();

    let mut found = Vec::new();
    for entry in glob::glob(&pattern).map_err(|e| CovError::glob(e.to_string()))? {
        found.push(entry.map_err(|e| CovError::glob(e.to_string()))?);
    }
    found.sort();

    tracing::debug!(count = found.len(), pattern = %pattern, "collected coverage profiles");
    Ok(found)
}
