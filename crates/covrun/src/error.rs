//! Error types for coverage runs

use std::path::PathBuf;
use thiserror::Error;

/// Result type for coverage run operations
pub type CovResult<T> = Result<T, CovError>;

/// Errors that can occur while orchestrating a coverage run
#[derive(Debug, Error)]
pub enum CovError {
    /// A toolchain process could not be started
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A toolchain process exited unsuccessfully
    #[error("`{command}` {}", describe_status(.status.as_ref()))]
    Toolchain {
        /// Rendered command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        status: Option<i32>,
    },

    /// A placeholder test file could not be created or written
    #[error("failed to create placeholder {}: {source}", .path.display())]
    Placeholder {
        /// Placeholder path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A placeholder test file could not be removed
    #[error("failed to remove placeholder {}: {source}", .path.display())]
    Cleanup {
        /// Placeholder path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The scratch directory for coverage output could not be allocated
    #[error("failed to allocate coverage workspace: {source}")]
    Workspace {
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Profile discovery failed
    #[error("profile lookup failed: {message}")]
    Glob {
        /// Error message
        message: String,
    },

    /// A coverage profile could not be parsed
    #[error("{}:{line}: {message}", .path.display())]
    Profile {
        /// Profile path
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Error message
        message: String,
    },

    /// Profiles with different coverage modes cannot be merged
    #[error("cannot merge profiles with mode `{found}` into mode `{expected}`")]
    ModeMismatch {
        /// Mode of the first profile
        expected: String,
        /// Conflicting mode
        found: String,
    },

    /// Profiles disagree about a block
    #[error("merge failed: {message}")]
    Merge {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_status(status: Option<&i32>) -> String {
    match status {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

impl CovError {
    /// Create a toolchain failure error
    #[must_use]
    pub fn toolchain(command: impl Into<String>, status: Option<i32>) -> Self {
        Self::Toolchain {
            command: command.into(),
            status,
        }
    }

    /// Create a profile discovery error
    #[must_use]
    pub fn glob(message: impl Into<String>) -> Self {
        Self::Glob {
            message: message.into(),
        }
    }

    /// Create a profile parse error
    #[must_use]
    pub fn profile(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Profile {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a merge error
    #[must_use]
    pub fn merge(message: impl Into<String>) -> Self {
        Self::Merge {
            message: message.into(),
        }
    }

    /// Exit code of the failed toolchain process, if this is a toolchain failure
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Toolchain { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_toolchain_error_with_code() {
        let err = CovError::toolchain("go test ./...", Some(1));
        assert_eq!(err.to_string(), "`go test ./...` exited with status 1");
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_toolchain_error_signal() {
        let err = CovError::toolchain("go list", None);
        assert!(err.to_string().contains("signal"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_profile_error_location() {
        let err = CovError::profile("/tmp/cover.cov", 3, "bad block");
        assert_eq!(err.to_string(), "/tmp/cover.cov:3: bad block");
    }

    #[test]
    fn test_mode_mismatch() {
        let err = CovError::ModeMismatch {
            expected: "set".to_string(),
            found: "count".to_string(),
        };
        assert!(err.to_string().contains("`count`"));
        assert!(err.to_string().contains("`set`"));
    }

    #[test]
    fn test_cleanup_error_names_path() {
        let err = CovError::Cleanup {
            path: PathBuf::from("pkg/a_test.go"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("pkg/a_test.go"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CovError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
