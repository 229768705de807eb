//! Turning collected profiles into one report
//!
//! The orchestrator only knows the [`ProfileMerger`] contract: take zero or
//! more profile paths, write one consolidated report. Two implementations
//! ship with the crate.

#![allow(clippy::cast_precision_loss)]

use crate::error::CovResult;
use crate::profile::{merge_profiles, CoverMode, Profile, ProfileBlock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

/// Merges coverage profiles into a single report on `out`
pub trait ProfileMerger: fmt::Debug {
    /// Merge `profiles` and write the result
    ///
    /// An empty `profiles` list is valid and yields an empty report.
    ///
    /// # Errors
    ///
    /// Returns an error if a profile cannot be read, parsed or merged, or
    /// if writing to `out` fails.
    fn merge(&self, profiles: &[PathBuf], out: &mut dyn Write) -> CovResult<()>;
}

/// Coverage summary for one source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    /// File name as recorded in the profile
    pub file: String,
    /// Total statements
    pub statements: u64,
    /// Statements that ran
    pub covered: u64,
    /// `covered / statements` as a percentage
    pub percent: f64,
    /// Blocks in span order
    pub blocks: Vec<ProfileBlock>,
}

/// Consolidated coverage report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedReport {
    /// Coverage mode, `None` when no profile was merged
    pub mode: Option<CoverMode>,
    /// Per-file summaries in name order
    pub files: Vec<FileReport>,
    /// Total statements
    pub statements: u64,
    /// Statements that ran
    pub covered: u64,
    /// `covered / statements` as a percentage
    pub percent: f64,
}

fn percent(covered: u64, statements: u64) -> f64 {
    if statements == 0 {
        0.0
    } else {
        covered as f64 * 100.0 / statements as f64
    }
}

impl MergedReport {
    /// Report with no files
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            mode: None,
            files: Vec::new(),
            statements: 0,
            covered: 0,
            percent: 0.0,
        }
    }

    /// Build a report from a merged profile
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        let files: Vec<FileReport> = profile
            .files()
            .map(|(file, blocks)| {
                let blocks: Vec<ProfileBlock> = blocks.copied().collect();
                let statements = blocks.iter().map(|b| u64::from(b.num_stmt)).sum();
                let covered = blocks
                    .iter()
                    .filter(|b| b.is_covered())
                    .map(|b| u64::from(b.num_stmt))
                    .sum();
                FileReport {
                    file: file.to_string(),
                    statements,
                    covered,
                    percent: percent(covered, statements),
                    blocks,
                }
            })
            .collect();

        let statements = profile.statements();
        let covered = profile.covered();
        Self {
            mode: Some(profile.mode()),
            files,
            statements,
            covered,
            percent: percent(covered, statements),
        }
    }
}

/// Writes a pretty-printed JSON [`MergedReport`]
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonMerger;

impl ProfileMerger for JsonMerger {
    fn merge(&self, profiles: &[PathBuf], out: &mut dyn Write) -> CovResult<()> {
        let report = merge_profiles(profiles)?
            .as_ref()
            .map_or_else(MergedReport::empty, MergedReport::from_profile);
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

/// Writes the merged profile back in the `go test -coverprofile` format
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileTextMerger;

impl ProfileMerger for ProfileTextMerger {
    fn merge(&self, profiles: &[PathBuf], out: &mut dyn Write) -> CovResult<()> {
        if let Some(profile) = merge_profiles(profiles)? {
            profile.write_text(out)?;
        }
        out.flush()?;
        Ok(())
    }
}
