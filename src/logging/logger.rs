//! Structured logger counting the problems it reports.
use std::sync::atomic::{AtomicUsize, Ordering};

use super::STAGE_TARGET;
use super::types::Log;

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Console logger backed by the global [`tracing`] subscriber.
///
/// Keeps a running count of warnings and errors, reported as a one-line
/// [`summary`](Self::summary) once the command has finished.
#[derive(Debug, Default)]
pub struct Logger {
    warnings: AtomicUsize,
    errors: AtomicUsize,
}

impl Logger {
    /// Create a logger with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        self.warnings.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Number of errors logged so far.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Number of warnings logged so far.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    /// One-line tally of the problems reported, or `None` if there were none.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        let (warnings, errors) = (self.warning_count(), self.error_count());
        match (warnings, errors) {
            (0, 0) => None,
            (w, 0) => Some(format!("{w} warning(s)")),
            (0, e) => Some(format!("{e} error(s)")),
            (w, e) => Some(format!("{w} warning(s), {e} error(s)")),
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);
}
