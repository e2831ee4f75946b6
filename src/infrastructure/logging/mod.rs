//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Sinks described by the `logging_config` document
//! - Template and JSON record layouts
//! - Size, interval and time-of-day file rotation with retention
//! - Forwarding of `log` crate records into the same sinks

pub mod config;
pub mod format;
pub mod intercept;
pub mod levels;
pub mod logger;
pub mod rotation;
pub mod sinks;

pub use config::{
    Compression, LoggingDocument, Retention, Rotation, SinkConfigError, SinkSpec, SinkTarget,
};
pub use format::{TemplateFormat, DEFAULT_TEMPLATE};
pub use intercept::InterceptBridge;
pub use levels::{level_from_log, level_from_name, DEFAULT_LEVEL};
pub use logger::{
    active_sink_count, active_sinks, shutdown, LoggingBootstrap, LoggingError, LoggingReport,
};
pub use rotation::{LogRotator, RotatingFileWriter};
pub use sinks::{LevelGate, SinkSet};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, trace, warn};
