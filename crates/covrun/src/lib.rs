//! covrun: complete Go coverage runs
//!
//! `go test -coverprofile` silently leaves packages without test files out
//! of the profile, which inflates the aggregate number. covrun lists the
//! requested packages, drops an empty `_test.go` next to every untested
//! source file, runs the tests with coverage into a private scratch
//! directory, merges the resulting profile(s) into one report, and removes
//! everything it created on the way out, whether the run succeeded or not.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use covrun::{JsonMerger, Orchestrator, RunConfig, SystemRunner, TracingDiagnostics};
//!
//! let orchestrator = Orchestrator::new(
//!     RunConfig::default(),
//!     &SystemRunner,
//!     &JsonMerger,
//!     &TracingDiagnostics,
//! );
//! let packages = vec!["./...".to_string()];
//! let summary = orchestrator.run(&packages, &[], &mut std::io::stdout())?;
//! eprintln!("{} placeholder test files", summary.placeholders);
//! # Ok::<(), covrun::CovError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod collect;
mod config;
pub mod diagnostics;
mod error;
pub mod listing;
pub mod merge;
pub mod orchestrator;
pub mod placeholder;
pub mod process;
pub mod profile;
pub mod toolchain;
pub mod workspace;

pub use collect::collect_profiles;
pub use config::{RunConfig, DEFAULT_LIST_FORMAT, DEFAULT_PROFILE_NAME};
pub use diagnostics::{Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use error::{CovError, CovResult};
pub use listing::{parse_listing, parse_listing_line, PackageDescriptor};
pub use merge::{FileReport, JsonMerger, MergedReport, ProfileMerger, ProfileTextMerger};
pub use orchestrator::{settle, Orchestrator, RunStage, RunSummary};
pub use placeholder::{
    placeholder_contents, placeholder_name, remove_created_files, synthesize_placeholders,
    PlaceholderFiles,
};
pub use process::{Invocation, InvocationOutput, ProcessRunner, StdinMode, StdoutMode, SystemRunner};
pub use profile::{merge_profiles, BlockSpan, CoverMode, Profile, ProfileBlock};
pub use toolchain::{GoToolchain, ListedPackages};
pub use workspace::CoverageWorkspace;
