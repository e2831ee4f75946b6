//! Routes records from the `log` facade into the tracing sinks.
//!
//! Libraries that log through `log` (rather than `tracing`) would otherwise
//! bypass every configured sink. The bridge re-emits each record as a tracing
//! event carrying the record's own level, target, file and line.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::level_filters::LevelFilter;

use super::levels::{level_from_log, log_filter_for};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// `log::Log` implementation forwarding into the current tracing dispatcher.
#[derive(Debug, Clone, Default)]
pub struct InterceptBridge {
    ignored: Vec<String>,
}

impl InterceptBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop records whose target starts with `prefix`.
    #[must_use]
    pub fn ignore_target(mut self, prefix: impl Into<String>) -> Self {
        self.ignored.push(prefix.into());
        self
    }

    /// Register as the process-wide `log` logger.
    ///
    /// Only the first call in a process registers anything; later calls just
    /// move the `log` max level. Returns whether this call did the registration.
    pub fn install(self, max_level: LevelFilter) -> bool {
        let registered = if INSTALLED.swap(true, Ordering::AcqRel) {
            false
        } else if let Err(err) = log::set_boxed_logger(Box::new(self)) {
            tracing::warn!(error = %err, "Another `log` logger is already installed");
            false
        } else {
            true
        };

        log::set_max_level(log_filter_for(max_level));
        registered
    }

    /// Whether the process-wide bridge has been registered.
    pub fn is_installed() -> bool {
        INSTALLED.load(Ordering::Acquire)
    }

    fn is_ignored(&self, target: &str) -> bool {
        self.ignored.iter().any(|prefix| target.starts_with(prefix.as_str()))
    }
}

impl log::Log for InterceptBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        level_from_log(metadata.level()) <= LevelFilter::current()
            && !self.is_ignored(metadata.target())
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            // A sink failure must never surface in the caller.
            let _ = tracing_log::format_trace(record);
        }
    }

    fn flush(&self) {}
}
