//! Infrastructure layer module
//!
//! - Configuration loading, resolution and caching
//! - Logging bootstrap and sinks
//! - HTTP entrypoint

pub mod config;
pub mod http;
pub mod logging;
