//! Test command handler

use crate::commands::TestArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::StatusReporter;
use crate::testflag;
use covrun::{Orchestrator, RunConfig, SystemRunner};
use std::io::Write;

/// Execute the test command, writing the merged report to stdout
///
/// # Errors
///
/// Returns an error if the arguments are invalid or any stage of the run
/// fails.
pub fn execute_test(config: &CliConfig, args: &TestArgs) -> CliResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_test(config, args, &mut out)
}

/// Execute the test command against any writer
///
/// # Errors
///
/// See [`execute_test`].
pub fn run_test(config: &CliConfig, args: &TestArgs, out: &mut dyn Write) -> CliResult<()> {
    if args.go.trim().is_empty() {
        return Err(CliError::config("--go must name a Go toolchain binary"));
    }
    let split = testflag::split(&args.args)?;
    let reporter = StatusReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    if config.verbosity.is_verbose() {
        reporter.info(&format!(
            "go: {}, packages: [{}], flags: [{}]",
            args.go,
            split.packages.join(" "),
            split.flags.join(" ")
        ));
    }

    let run_config = RunConfig::new().with_go_binary(&args.go);
    let orchestrator = Orchestrator::new(run_config, &SystemRunner, args.format.merger(), &reporter);

    match orchestrator.run(&split.packages, &split.flags, out) {
        Ok(summary) => {
            reporter.run_summary(&summary);
            Ok(())
        }
        Err(err) => {
            tracing::debug!(error = %err, "coverage run failed");
            reporter.failure("coverage run failed");
            Err(err.into())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::ReportFormat;

    fn args(go: &str, rest: &[&str]) -> TestArgs {
        TestArgs {
            go: go.to_string(),
            format: ReportFormat::Json,
            args: rest.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_reserved_flag_is_rejected_before_running() {
        let mut out = Vec::new();
        let err = run_test(
            &CliConfig::new(),
            &args("definitely-not-a-go-binary", &["-coverprofile=x"]),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_go_binary_is_a_config_error() {
        let mut out = Vec::new();
        let err = run_test(&CliConfig::new(), &args("  ", &["./..."]), &mut out).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_missing_toolchain_is_a_run_error() {
        let mut out = Vec::new();
        let err = run_test(
            &CliConfig::new(),
            &args("covrun-no-such-go-binary", &["./..."]),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Run(_)));
        assert!(err.to_string().contains("covrun-no-such-go-binary"));
        assert!(out.is_empty());
    }
}
