//! Diagnostics sink for non-fatal problems
//!
//! Failures that must not change the outcome of a run (a scratch directory
//! that refuses to go away, a cleanup error that is shadowed by an earlier
//! failure) are reported through a [`Diagnostics`] implementation instead of
//! being dropped.

use std::sync::Mutex;

/// Receiver for non-fatal warnings raised during a run
pub trait Diagnostics: std::fmt::Debug {
    /// Report a warning
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Keeps warnings in memory so callers can inspect them
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings recorded so far, oldest first
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    /// Check whether any recorded warning contains `needle`
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.warnings().iter().any(|w| w.contains(needle))
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(message.to_string());
        }
    }
}
