//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use covrun::{JsonMerger, ProfileMerger, ProfileTextMerger};
use std::path::PathBuf;

/// covrun: Go test coverage that counts packages without tests
#[derive(Parser, Debug)]
#[command(name = "covrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run `go test` with coverage, including packages without test files
    ///
    /// Everything after the options is split into package patterns and
    /// `go test` flags. Put `--` before the first `go test` flag if it
    /// could be mistaken for one of covrun's own options, as in
    /// `covrun test -- -v -race ./...`
    Test(TestArgs),

    /// Merge existing coverage profiles into one report
    Convert(ConvertArgs),
}

/// Arguments for the test command
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Go toolchain binary
    #[arg(long, env = "COVRUN_GO", default_value = "go")]
    pub go: String,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value = "json")]
    pub format: ReportFormat,

    /// Package patterns and `go test` flags
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub args: Vec<String>,
}

/// Arguments for the convert command
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Coverage profiles to merge
    #[arg(required = true)]
    pub profiles: Vec<PathBuf>,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

/// Merged report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// JSON summary with per-file statement counts
    #[default]
    Json,
    /// Merged Go coverage profile text
    Profile,
}

impl ReportFormat {
    /// Merger that produces this format
    #[must_use]
    pub fn merger(self) -> &'static dyn ProfileMerger {
        match self {
            Self::Json => &JsonMerger,
            Self::Profile => &ProfileTextMerger,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
