//! Go toolchain commands used by a coverage run

use crate::config::RunConfig;
use crate::error::{CovError, CovResult};
use crate::listing::{parse_listing, PackageDescriptor};
use crate::process::{Invocation, InvocationOutput, ProcessRunner, StdinMode, StdoutMode};
use std::path::Path;

/// Builds and runs `go list` and `go test`
#[derive(Debug)]
pub struct GoToolchain<'a> {
    runner: &'a dyn ProcessRunner,
    config: &'a RunConfig,
}

impl<'a> GoToolchain<'a> {
    /// Create a toolchain wrapper
    #[must_use]
    pub fn new(runner: &'a dyn ProcessRunner, config: &'a RunConfig) -> Self {
        Self { runner, config }
    }

    /// `go list -f <format> <packages...>`
    ///
    /// Stdin is shared, stdout captured for parsing.
    #[must_use]
    pub fn list_invocation(&self, packages: &[String]) -> Invocation {
        Invocation::new(&self.config.go_binary)
            .args(["list", "-f", self.config.list_format.as_str()])
            .args(packages)
            .with_stdin(StdinMode::Inherit)
            .with_stdout(StdoutMode::Capture)
    }

    /// `go test -coverprofile <profile> <flags...> <packages...>`
    ///
    /// Stdin is closed and stdout goes to our stderr, so the report written
    /// to stdout later is never mixed with test chatter.
    #[must_use]
    pub fn test_invocation(
        &self,
        profile: &Path,
        test_flags: &[String],
        packages: &[String],
    ) -> Invocation {
        Invocation::new(&self.config.go_binary)
            .args(["test", "-coverprofile"])
            .arg(profile)
            .args(test_flags)
            .args(packages)
            .with_stdin(StdinMode::Null)
            .with_stdout(StdoutMode::Stderr)
    }

    /// List `packages` and parse the output
    ///
    /// # Errors
    ///
    /// Returns an error if `go list` cannot be started or exits non-zero.
    pub fn list_packages(&self, packages: &[String]) -> CovResult<ListedPackages> {
        let invocation = self.list_invocation(packages);
        let output = self.execute(&invocation)?;
        let raw = output.stdout_lossy();
        let descriptors = parse_listing(&raw);
        Ok(ListedPackages { raw, descriptors })
    }

    /// Run the tests, writing the coverage profile to `profile`
    ///
    /// # Errors
    ///
    /// Returns an error if `go test` cannot be started or exits non-zero.
    pub fn run_tests(
        &self,
        profile: &Path,
        test_flags: &[String],
        packages: &[String],
    ) -> CovResult<()> {
        let invocation = self.test_invocation(profile, test_flags, packages);
        self.execute(&invocation).map(|_| ())
    }

    fn execute(&self, invocation: &Invocation) -> CovResult<InvocationOutput> {
        tracing::info!(command = %invocation, "running");
        let output = self.runner.run(invocation)?;
        if output.is_success() {
            Ok(output)
        } else {
            Err(CovError::toolchain(invocation.to_string(), output.status))
        }
    }
}

/// Parsed `go list` output together with the raw text
#[derive(Debug, Clone, Default)]
pub struct ListedPackages {
    /// Raw stdout of `go list`
    pub raw: String,
    /// Packages parsed from it
    pub descriptors: Vec<PackageDescriptor>,
}

impl ListedPackages {
    /// Non-empty output that yielded no packages usually means the
    /// output format changed under us
    #[must_use]
    pub fn looks_unparsed(&self) -> bool {
        self.descriptors.is_empty() && !self.raw.trim().is_empty()
    }
}
