//! End-to-end coverage run
//!
//! ```text
//! Listing -> Synthesizing -> AllocatingWorkspace -> Running -> Collecting -> Merging
//! ```
//!
//! A failing stage ends the run immediately. Cleanup is tied to guards
//! created as each resource is acquired, so only resources that exist are
//! released. The workspace is torn down before the placeholders are removed.

use crate::collect::collect_profiles;
use crate::config::RunConfig;
use crate::diagnostics::Diagnostics;
use crate::error::CovResult;
use crate::merge::ProfileMerger;
use crate::placeholder::PlaceholderFiles;
use crate::process::ProcessRunner;
use crate::toolchain::{GoToolchain, ListedPackages};
use crate::workspace::CoverageWorkspace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// Stage of a coverage run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStage {
    /// `go list`
    Listing,
    /// Creating placeholder test files
    Synthesizing,
    /// Creating the scratch directory
    AllocatingWorkspace,
    /// `go test -coverprofile`
    Running,
    /// Finding the written profiles
    Collecting,
    /// Writing the merged report
    Merging,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Listing => "listing",
            Self::Synthesizing => "synthesizing",
            Self::AllocatingWorkspace => "allocating-workspace",
            Self::Running => "running",
            Self::Collecting => "collecting",
            Self::Merging => "merging",
        };
        f.write_str(name)
    }
}

/// What a successful run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Packages reported by `go list`
    pub packages: usize,
    /// Placeholder test files created (and removed again)
    pub placeholders: usize,
    /// Coverage profiles handed to the merger
    pub profiles: usize,
}

/// Runs the whole pipeline against injected collaborators
#[derive(Debug)]
pub struct Orchestrator<'a> {
    config: RunConfig,
    runner: &'a dyn ProcessRunner,
    merger: &'a dyn ProfileMerger,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator
    #[must_use]
    pub fn new(
        config: RunConfig,
        runner: &'a dyn ProcessRunner,
        merger: &'a dyn ProfileMerger,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        Self {
            config,
            runner,
            merger,
            diagnostics,
        }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run tests for `packages` with `test_flags` and write the merged
    /// coverage report to `out`
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing stage. If that stage ran after
    /// placeholders were created and their removal also fails, the removal
    /// error is reported as a warning. If every stage succeeded but removal
    /// fails, the removal error is returned.
    pub fn run(
        &self,
        packages: &[String],
        test_flags: &[String],
        out: &mut dyn Write,
    ) -> CovResult<RunSummary> {
        let toolchain = GoToolchain::new(self.runner, &self.config);

        tracing::debug!(stage = %RunStage::Listing, packages = packages.len());
        let listed = toolchain.list_packages(packages)?;
        if listed.looks_unparsed() {
            self.diagnostics.warn(
                "`go list` produced output but no package lines could be parsed; \
                 coverage for untested packages may be missing",
            );
        }

        let mut placeholders = PlaceholderFiles::new(self.diagnostics);
        let outcome = self.run_with_placeholders(
            &toolchain,
            &listed,
            &mut placeholders,
            packages,
            test_flags,
            out,
        );
        let cleanup = placeholders.release();
        settle(outcome, cleanup, self.diagnostics)
    }

    fn run_with_placeholders(
        &self,
        toolchain: &GoToolchain<'_>,
        listed: &ListedPackages,
        placeholders: &mut PlaceholderFiles<'_>,
        packages: &[String],
        test_flags: &[String],
        out: &mut dyn Write,
    ) -> CovResult<RunSummary> {
        tracing::debug!(stage = %RunStage::Synthesizing, packages = listed.descriptors.len());
        let created = placeholders.synthesize(&listed.descriptors)?;
        if created > 0 {
            tracing::info!(created, "created placeholder test files");
        }

        tracing::debug!(stage = %RunStage::AllocatingWorkspace);
        let workspace = CoverageWorkspace::allocate(
            &self.config.workspace_prefix,
            self.config.profile_name.as_str(),
            self.diagnostics,
        )?;

        tracing::debug!(stage = %RunStage::Running);
        toolchain.run_tests(&workspace.profile_path(), test_flags, packages)?;

        tracing::debug!(stage = %RunStage::Collecting);
        let profiles = collect_profiles(workspace.path(), workspace.profile_name())?;
        if profiles.is_empty() {
            tracing::info!("test run wrote no coverage profile");
        }

        tracing::debug!(stage = %RunStage::Merging, profiles = profiles.len());
        self.merger.merge(&profiles, out)?;

        workspace.close();
        Ok(RunSummary {
            packages: listed.descriptors.len(),
            placeholders: created,
            profiles: profiles.len(),
        })
    }
}

/// Combine the run outcome with the placeholder cleanup outcome
///
/// A run failure wins over a cleanup failure, which is still reported.
pub fn settle<T>(
    outcome: CovResult<T>,
    cleanup: CovResult<()>,
    diagnostics: &dyn Diagnostics,
) -> CovResult<T> {
    match (outcome, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(cleanup_err)) => Err(cleanup_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(cleanup_err)) => {
            diagnostics.warn(&format!("{cleanup_err} (while handling: {err})"));
            Err(err)
        }
    }
}
