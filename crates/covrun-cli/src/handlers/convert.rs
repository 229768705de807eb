//! Convert command handler

use crate::commands::ConvertArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::StatusReporter;
use std::io::Write;

/// Execute the convert command, writing the merged report to stdout
///
/// # Errors
///
/// Returns an error if a profile cannot be read, parsed or merged.
pub fn execute_convert(config: &CliConfig, args: &ConvertArgs) -> CliResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_convert(config, args, &mut out)
}

/// Execute the convert command against any writer
///
/// # Errors
///
/// See [`execute_convert`].
pub fn run_convert(config: &CliConfig, args: &ConvertArgs, out: &mut dyn Write) -> CliResult<()> {
    args.format.merger().merge(&args.profiles, out)?;
    let reporter = StatusReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    if config.verbosity.is_verbose() {
        reporter.info(&format!("merged {} profile(s)", args.profiles.len()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::ReportFormat;
    use crate::error::CliError;
    use covrun::CovError;
    use std::fs;
    use tempfile::TempDir;

    fn convert_args(dir: &TempDir, files: &[(&str, &str)], format: ReportFormat) -> ConvertArgs {
        let profiles = files
            .iter()
            .map(|(name, text)| {
                let path = dir.path().join(name);
                fs::write(&path, text).unwrap();
                path
            })
            .collect();
        ConvertArgs { profiles, format }
    }

    #[test]
    fn test_profile_format_merges_counts() {
        let tmp = TempDir::new().unwrap();
        let args = convert_args(
            &tmp,
            &[
                ("a.cov", "mode: count\na.go:1.1,2.2 1 2\n"),
                ("b.cov", "mode: count\na.go:1.1,2.2 1 3\n"),
            ],
            ReportFormat::Profile,
        );
        let mut out = Vec::new();
        run_convert(&CliConfig::new(), &args, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "mode: count\na.go:1.1,2.2 1 5\n"
        );
    }

    #[test]
    fn test_mode_mismatch_fails() {
        let tmp = TempDir::new().unwrap();
        let args = convert_args(
            &tmp,
            &[
                ("a.cov", "mode: set\na.go:1.1,2.2 1 1\n"),
                ("b.cov", "mode: count\na.go:1.1,2.2 1 3\n"),
            ],
            ReportFormat::Json,
        );
        let mut out = Vec::new();
        let err = run_convert(&CliConfig::new(), &args, &mut out).unwrap_err();
        assert!(matches!(err, CliError::Run(CovError::ModeMismatch { .. })));
    }
}
