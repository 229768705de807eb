//! Go coverage profiles
//!
//! Text format written by `go test -coverprofile`:
//!
//! ```text
//! mode: set
//! example.com/pkg/file.go:10.2,12.16 2 1
//! ```
//!
//! Each block line is `file:startLine.startCol,endLine.endCol numStmt count`.
//! Blocks are keyed by file and span; the same block seen twice (in one
//! file or across files) is merged according to the coverage mode.

use crate::error::{CovError, CovResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{Entry, Values};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Coverage counting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverMode {
    /// Whether each block ran
    Set,
    /// How many times each block ran
    Count,
    /// Like `Count`, safe under parallel tests
    Atomic,
}

impl CoverMode {
    /// Combine two counts of the same block
    #[must_use]
    pub fn combine(self, a: u64, b: u64) -> u64 {
        match self {
            Self::Set => a.max(b),
            Self::Count | Self::Atomic => a.saturating_add(b),
        }
    }

    /// Name as written in the `mode:` line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Count => "count",
            Self::Atomic => "atomic",
        }
    }
}

impl fmt::Display for CoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Self::Set),
            "count" => Ok(Self::Count),
            "atomic" => Ok(Self::Atomic),
            other => Err(format!("unknown coverage mode `{other}`")),
        }
    }
}

/// Source span of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockSpan {
    /// First line
    pub start_line: u32,
    /// First column
    pub start_col: u32,
    /// Last line
    pub end_line: u32,
    /// Column after the end
    pub end_col: u32,
}

impl fmt::Display for BlockSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{},{}.{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// One counted block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileBlock {
    /// Where the block is
    #[serde(flatten)]
    pub span: BlockSpan,
    /// Statements in the block
    pub num_stmt: u32,
    /// Execution count
    pub count: u64,
}

impl ProfileBlock {
    /// Whether the block ran at least once
    #[must_use]
    pub const fn is_covered(&self) -> bool {
        self.count > 0
    }
}

/// A parsed, possibly merged, coverage profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    mode: CoverMode,
    files: BTreeMap<String, BTreeMap<BlockSpan, ProfileBlock>>,
}

#[allow(clippy::expect_used)]
fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(.+):([0-9]+)\.([0-9]+),([0-9]+)\.([0-9]+) ([0-9]+) ([0-9]+)$")
            .expect("profile block pattern is valid")
    })
}

impl Profile {
    /// Create an empty profile
    #[must_use]
    pub const fn new(mode: CoverMode) -> Self {
        Self {
            mode,
            files: BTreeMap::new(),
        }
    }

    /// Read and parse a profile file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn read(path: &Path) -> CovResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(path, &text)
    }

    /// Parse profile text; `path` is only used in error messages
    ///
    /// # Errors
    ///
    /// Returns [`CovError::Profile`] for a missing or unknown mode line, a
    /// malformed block line, or a second mode line that disagrees with the
    /// first. Returns [`CovError::Merge`] if a block repeats with a different
    /// statement count.
    pub fn parse(path: &Path, text: &str) -> CovResult<Self> {
        let mut profile: Option<Self> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end();
            if line.is_empty() {
                continue;
            }

            if let Some(mode) = line.strip_prefix("mode:") {
                let mode = CoverMode::from_str(mode.trim())
                    .map_err(|message| CovError::profile(path, line_no, message))?;
                match profile.as_ref().map(Self::mode) {
                    None => profile = Some(Self::new(mode)),
                    Some(existing) if existing == mode => {}
                    Some(existing) => {
                        return Err(CovError::profile(
                            path,
                            line_no,
                            format!("mode `{mode}` conflicts with earlier mode `{existing}`"),
                        ))
                    }
                }
                continue;
            }

            let Some(profile) = profile.as_mut() else {
                return Err(CovError::profile(path, line_no, "expected `mode:` line"));
            };
            let (file, block) = parse_block_line(line)
                .ok_or_else(|| CovError::profile(path, line_no, format!("malformed block `{line}`")))?;
            profile.insert(file, block)?;
        }

        profile.ok_or_else(|| CovError::profile(path, 1, "empty profile"))
    }

    /// Coverage mode
    #[must_use]
    pub const fn mode(&self) -> CoverMode {
        self.mode
    }

    /// Files in name order with their blocks in span order
    pub fn files(&self) -> impl Iterator<Item = (&str, Values<'_, BlockSpan, ProfileBlock>)> {
        self.files
            .iter()
            .map(|(name, blocks)| (name.as_str(), blocks.values()))
    }

    /// Number of distinct files
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Add one block, combining with an existing block at the same span
    ///
    /// # Errors
    ///
    /// Returns [`CovError::Merge`] if the statement counts disagree.
    pub fn insert(&mut self, file: impl Into<String>, block: ProfileBlock) -> CovResult<()> {
        let file = file.into();
        let mode = self.mode;
        let blocks = self.files.entry(file).or_default();
        match blocks.entry(block.span) {
            Entry::Vacant(slot) => {
                slot.insert(block);
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                if existing.num_stmt != block.num_stmt {
                    return Err(CovError::merge(format!(
                        "block {} has {} statements in one profile and {} in another",
                        block.span, existing.num_stmt, block.num_stmt
                    )));
                }
                existing.count = mode.combine(existing.count, block.count);
                Ok(())
            }
        }
    }

    /// Fold `other` into this profile
    ///
    /// # Errors
    ///
    /// Returns [`CovError::ModeMismatch`] if the modes differ, or
    /// [`CovError::Merge`] on conflicting blocks.
    pub fn merge(&mut self, other: &Self) -> CovResult<()> {
        if self.mode != other.mode {
            return Err(CovError::ModeMismatch {
                expected: self.mode.to_string(),
                found: other.mode.to_string(),
            });
        }
        for (file, blocks) in &other.files {
            for block in blocks.values() {
                self.insert(file.clone(), *block)?;
            }
        }
        Ok(())
    }

    /// Total statements
    #[must_use]
    pub fn statements(&self) -> u64 {
        self.files
            .values()
            .flat_map(BTreeMap::values)
            .map(|b| u64::from(b.num_stmt))
            .sum()
    }

    /// Statements in blocks that ran
    #[must_use]
    pub fn covered(&self) -> u64 {
        self.files
            .values()
            .flat_map(BTreeMap::values)
            .filter(|b| b.is_covered())
            .map(|b| u64::from(b.num_stmt))
            .sum()
    }

    /// Write in the `go test -coverprofile` text format
    ///
    /// # Errors
    ///
    /// Returns any error from `out`.
    pub fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "mode: {}", self.mode)?;
        for (file, blocks) in &self.files {
            for block in blocks.values() {
                writeln!(out, "{file}:{} {} {}", block.span, block.num_stmt, block.count)?;
            }
        }
        Ok(())
    }
}

fn parse_block_line(line: &str) -> Option<(String, ProfileBlock)> {
    let caps = block_pattern().captures(line)?;
    let num = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();
    let span = BlockSpan {
        start_line: num(2)?,
        start_col: num(3)?,
        end_line: num(4)?,
        end_col: num(5)?,
    };
    let block = ProfileBlock {
        span,
        num_stmt: num(6)?,
        count: caps.get(7)?.as_str().parse().ok()?,
    };
    Some((caps.get(1)?.as_str().to_string(), block))
}

/// Read and merge every profile in `paths`
///
/// Returns `None` when `paths` is empty.
///
/// # Errors
///
/// Returns the first read, parse or merge error.
pub fn merge_profiles<P: AsRef<Path>>(paths: &[P]) -> CovResult<Option<Profile>> {
    let mut merged: Option<Profile> = None;
    for path in paths {
        let profile = Profile::read(path.as_ref())?;
        match merged.as_mut() {
            None => merged = Some(profile),
            Some(acc) => acc.merge(&profile)?,
        }
    }
    Ok(merged)
}
