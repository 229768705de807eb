//! `tracing` subscriber setup

use crate::config::CliConfig;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
#[must_use]
pub fn default_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.verbosity.log_filter())
}

/// Install the global subscriber writing to stderr
///
/// `RUST_LOG` overrides the level derived from `-q`/`-v`. A second call is a
/// no-op.
pub fn init_logging(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Verbosity;

    #[test]
    fn test_default_filter_follows_verbosity() {
        let config = CliConfig::new().with_verbosity(Verbosity::Debug);
        assert_eq!(default_filter(&config).to_string(), "debug");

        let config = CliConfig::new().with_verbosity(Verbosity::Quiet);
        assert_eq!(default_filter(&config).to_string(), "error");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = CliConfig::new();
        init_logging(&config);
        init_logging(&config);
    }
}
