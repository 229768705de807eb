//! Scratch directory for coverage output

use crate::diagnostics::Diagnostics;
use crate::error::{CovError, CovResult};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A private directory that receives the coverage profile of one run
///
/// The directory and everything in it is removed exactly once, by
/// [`CoverageWorkspace::close`] or on drop. A failed removal is reported to
/// the diagnostics sink and never turned into an error.
#[derive(Debug)]
pub struct CoverageWorkspace<'a> {
    dir: Option<TempDir>,
    root: PathBuf,
    profile_name: String,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> CoverageWorkspace<'a> {
    /// Allocate a uniquely named directory under the system temp dir
    ///
    /// # Errors
    ///
    /// Returns [`CovError::Workspace`] if the directory cannot be created.
    pub fn allocate(
        prefix: &str,
        profile_name: impl Into<String>,
        diagnostics: &'a dyn Diagnostics,
    ) -> CovResult<Self> {
        Self::allocate_in(std::env::temp_dir(), prefix, profile_name, diagnostics)
    }

    fn allocate_in(
        parent: impl AsRef<Path>,
        prefix: &str,
        profile_name: impl Into<String>,
        diagnostics: &'a dyn Diagnostics,
    ) -> CovResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(parent)
            .map_err(|source| CovError::Workspace { source })?;
        Ok(Self::from_dir(dir, profile_name, diagnostics))
    }

    fn from_dir(dir: TempDir, profile_name: impl Into<String>, diagnostics: &'a dyn Diagnostics) -> Self {
        let root = dir.path().to_path_buf();
        tracing::debug!(workspace = %root.display(), "allocated coverage workspace");
        Self {
            dir: Some(dir),
            root,
            profile_name: profile_name.into(),
            diagnostics,
        }
    }

    /// Directory path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// File name of the coverage profile
    #[must_use]
    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// Where the test run writes its coverage profile
    #[must_use]
    pub fn profile_path(&self) -> PathBuf {
        self.root.join(&self.profile_name)
    }

    /// Remove the directory now
    pub fn close(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match dir.close() {
            Ok(()) => tracing::debug!(workspace = %self.root.display(), "removed coverage workspace"),
            Err(e) => self.diagnostics.warn(&format!(
                "failed to clean up temp directory {}: {e}",
                self.root.display()
            )),
        }
    }
}

impl Drop for CoverageWorkspace<'_> {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;
    use std::fs;

    #[test]
    fn test_profile_path_inside_workspace() {
        let diag = RecordingDiagnostics::new();
        let ws = CoverageWorkspace::allocate("covrun", "cover.cov", &diag).unwrap();
        assert!(ws.path().is_dir());
        assert_eq!(ws.profile_path(), ws.path().join("cover.cov"));
        assert_eq!(ws.profile_name(), "cover.cov");
    }

    #[test]
    fn test_prefix_used() {
        let diag = RecordingDiagnostics::new();
        let ws = CoverageWorkspace::allocate("covrun-prefix", "cover.cov", &diag).unwrap();
        let name = ws.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("covrun-prefix"));
    }

    #[test]
    fn test_allocated_under_system_temp_dir() {
        let diag = RecordingDiagnostics::new();
        let ws = CoverageWorkspace::allocate("covrun", "cover.cov", &diag).unwrap();
        assert_eq!(ws.path().parent(), Some(std::env::temp_dir().as_path()));
    }

    #[test]
    fn test_close_removes_tree() {
        let diag = RecordingDiagnostics::new();
        let ws = CoverageWorkspace::allocate("covrun", "cover.cov", &diag).unwrap();
        let root = ws.path().to_path_buf();
        fs::write(ws.profile_path(), "mode: set\n").unwrap();
        fs::create_dir(root.join("nested")).unwrap();

        ws.close();
        assert!(!root.exists());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_drop_removes_tree() {
        let diag = RecordingDiagnostics::new();
        let root = {
            let ws = CoverageWorkspace::allocate("covrun", "cover.cov", &diag).unwrap();
            fs::write(ws.profile_path(), "mode: set\n").unwrap();
            ws.path().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[test]
    fn test_two_workspaces_never_share_profile_path() {
        let diag = RecordingDiagnostics::new();
        let a = CoverageWorkspace::allocate("covrun", "cover.cov", &diag).unwrap();
        let b = CoverageWorkspace::allocate("covrun", "cover.cov", &diag).unwrap();
        assert_ne!(a.profile_path(), b.profile_path());
    }

    #[test]
    fn test_removal_failure_is_only_a_warning() {
        let parent = tempfile::TempDir::new().unwrap();
        let diag = RecordingDiagnostics::new();
        let ws = CoverageWorkspace::allocate_in(parent.path(), "covrun", "cover.cov", &diag).unwrap();
        let root = ws.path().to_path_buf();

        // Removing it behind the guard's back makes the guard's own removal fail.
        fs::remove_dir_all(&root).unwrap();
        ws.close();

        assert!(diag.contains("failed to clean up temp directory"));
    }
}
