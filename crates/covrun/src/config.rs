//! Run configuration

use serde::{Deserialize, Serialize};

/// Default `go list` template: directory, package name and non-test sources
pub const DEFAULT_LIST_FORMAT: &str = "{{.Dir}} {{.Name}} {{.GoFiles}}";

/// Default coverage profile file name inside the workspace
pub const DEFAULT_PROFILE_NAME: &str = "cover.cov";

/// Configuration for a coverage run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Go toolchain binary
    pub go_binary: String,
    /// Coverage profile file name written inside the workspace
    pub profile_name: String,
    /// Prefix for the scratch directory name
    pub workspace_prefix: String,
    /// Template passed to `go list -f`
    pub list_format: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            go_binary: "go".to_string(),
            profile_name: DEFAULT_PROFILE_NAME.to_string(),
            workspace_prefix: "covrun".to_string(),
            list_format: DEFAULT_LIST_FORMAT.to_string(),
        }
    }
}

impl RunConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Go toolchain binary
    #[must_use]
    pub fn with_go_binary(mut self, go_binary: impl Into<String>) -> Self {
        self.go_binary = go_binary.into();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.go_binary, "go");
        assert_eq!(config.profile_name, "cover.cov");
        assert_eq!(config.list_format, "{{.Dir}} {{.Name}} {{.GoFiles}}");
    }

    #[test]
    fn test_with_go_binary() {
        let config = RunConfig::new().with_go_binary("/usr/local/go/bin/go");

        assert_eq!(config.go_binary, "/usr/local/go/bin/go");
        assert_eq!(config.profile_name, DEFAULT_PROFILE_NAME);
        assert_eq!(config.workspace_prefix, "covrun");
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"go_binary":"go1.22","profile_name":"cover.cov","workspace_prefix":"covrun","list_format":"{{.Dir}}"}"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.go_binary, "go1.22");
    }
}
