//! Package listing parser
//!
//! Parses the output of `go list -f "{{.Dir}} {{.Name}} {{.GoFiles}}"`.
//! Each package produces one line with the grammar:
//!
//! ```text
//! line  := dir ' ' name ' [' files ']'
//! dir   := any characters, spaces included
//! name  := non-whitespace characters
//! files := file (' ' file)* | empty
//! ```
//!
//! Lines that do not match are skipped. The toolchain prints the odd
//! warning on stdout and we would rather lose a line of noise than fail
//! the run.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// One package as reported by `go list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Absolute package directory
    pub dir: PathBuf,
    /// Package clause name
    pub name: String,
    /// Non-test source file names, relative to `dir`
    pub source_files: Vec<String>,
}

impl PackageDescriptor {
    /// Create a descriptor
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>, source_files: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            source_files,
        }
    }

    /// Package directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[allow(clippy::expect_used)]
fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+) (\S+) \[(.*)\]$").expect("listing pattern is valid"))
}

/// Parse a single listing line, returning `None` for lines that do not match
#[must_use]
pub fn parse_listing_line(line: &str) -> Option<PackageDescriptor> {
    let caps = line_pattern().captures(line.trim_end_matches('\r'))?;
    let dir = caps.get(1)?.as_str();
    let name = caps.get(2)?.as_str();
    let source_files = caps
        .get(3)?
        .as_str()
        .split(' ')
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();

    Some(PackageDescriptor::new(dir, name, source_files))
}

/// Parse the full listing output, one descriptor per matching line
#[must_use]
pub fn parse_listing(output: &str) -> Vec<PackageDescriptor> {
    output.lines().filter_map(parse_listing_line).collect()
}
