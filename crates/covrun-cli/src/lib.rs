//! covrun CLI library
//!
//! Argument parsing, stderr reporting, logging setup and the command
//! handlers behind the `covrun` binary. The coverage pipeline itself lives
//! in the `covrun` crate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod output;
pub mod testflag;

pub use commands::{Cli, ColorArg, Commands, ConvertArgs, ReportFormat, TestArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::init_logging;
pub use output::StatusReporter;
pub use testflag::SplitArgs;
