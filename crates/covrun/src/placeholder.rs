//! Placeholder test files
//!
//! `go test -coverprofile` leaves packages without any `_test.go` file out
//! of the profile entirely. Dropping an empty test file next to every
//! untested source file makes the package count as tested, so its
//! statements show up (uncovered) in the report.
//!
//! Every file created here is owned by a [`PlaceholderFiles`] guard, which
//! removes them again when it is released or dropped.

use crate::diagnostics::Diagnostics;
use crate::error::{CovError, CovResult};
use crate::listing::PackageDescriptor;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const SOURCE_SUFFIX: &str = ".go";
const TEST_SUFFIX: &str = "_test.go";

/// Test file name for a source file: `foo.go` becomes `foo_test.go`
#[must_use]
pub fn placeholder_name(source_file: &str) -> String {
    let stem = source_file
        .strip_suffix(SOURCE_SUFFIX)
        .unwrap_or(source_file);
    format!("{stem}{TEST_SUFFIX}")
}

/// Contents written into every placeholder
#[must_use]
pub fn placeholder_contents(package_name: &str) -> String {
    format!("package {package_name}\n")
}

/// Placeholder test files created during one run
///
/// Paths are kept in creation order. Removal happens exactly once: either
/// through [`PlaceholderFiles::release`], or when the guard is dropped.
#[derive(Debug)]
pub struct PlaceholderFiles<'a> {
    created: Vec<PathBuf>,
    released: bool,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> PlaceholderFiles<'a> {
    /// Create an empty guard
    #[must_use]
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            created: Vec::new(),
            released: false,
            diagnostics,
        }
    }

    /// Files created so far, in creation order
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.created
    }

    /// Number of files created so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.created.len()
    }

    /// Whether no file has been created
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }

    /// Create placeholders for every untested source file in `packages`
    ///
    /// Existing test files are left alone. Each created path is recorded
    /// before its contents are written, so a file that fails mid-write is
    /// still removed later.
    ///
    /// # Errors
    ///
    /// Returns [`CovError::Placeholder`] on the first filesystem error other
    /// than "already exists". Files created before the failure stay recorded.
    pub fn synthesize(&mut self, packages: &[PackageDescriptor]) -> CovResult<usize> {
        let before = self.created.len();

        for package in packages {
            let contents = placeholder_contents(&package.name);
            for source in &package.source_files {
                let path = package.dir().join(placeholder_name(source));
                self.create_one(path, &contents)?;
            }
        }

        let created = self.created.len() - before;
        tracing::debug!(created, packages = packages.len(), "placeholder synthesis done");
        Ok(created)
    }

    fn create_one(&mut self, path: PathBuf, contents: &str) -> CovResult<()> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
            Err(source) => return Err(CovError::Placeholder { path, source }),
        };
        self.created.push(path.clone());

        file.write_all(contents.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| CovError::Placeholder {
                path: path.clone(),
                source,
            })?;
        tracing::trace!(path = %path.display(), "created placeholder");
        Ok(())
    }

    /// Remove every created file now and disarm the guard
    ///
    /// # Errors
    ///
    /// Returns the first removal error. Later files are not attempted.
    pub fn release(mut self) -> CovResult<()> {
        self.released = true;
        remove_created_files(&self.created)
    }
}

impl Drop for PlaceholderFiles<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = remove_created_files(&self.created) {
            self.diagnostics.warn(&e.to_string());
        }
    }
}

/// Create placeholders for `packages`, returning the paths created
///
/// The caller becomes responsible for removing the returned files. On error
/// any files this call already created are removed before returning.
///
/// # Errors
///
/// See [`PlaceholderFiles::synthesize`].
pub fn synthesize_placeholders(
    packages: &[PackageDescriptor],
    diagnostics: &dyn Diagnostics,
) -> CovResult<Vec<PathBuf>> {
    let mut files = PlaceholderFiles::new(diagnostics);
    files.synthesize(packages)?;
    files.released = true;
    Ok(std::mem::take(&mut files.created))
}

/// Remove `files` in order, stopping at the first failure
///
/// # Errors
///
/// Returns [`CovError::Cleanup`] naming the first file that could not be removed.
pub fn remove_created_files<P: AsRef<Path>>(files: &[P]) -> CovResult<()> {
    for file in files {
        let path = file.as_ref();
        std::fs::remove_file(path).map_err(|source| CovError::Cleanup {
            path: path.to_path_buf(),
            source,
        })?;
    }
    if !files.is_empty() {
        tracing::debug!(removed = files.len(), "removed placeholder test files");
    }
    Ok(())
}
