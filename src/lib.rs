//! aicontent - configuration and logging core for an AI content service
//!
//! Loads model/provider settings, prompt templates and logging configuration
//! from YAML or JSON documents, caches them for the life of the process, and
//! wires structured logging before anything else runs.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): Document types, settings and errors
//! - **Service Layer** (`services`): Typed accessors over cached documents
//! - **Infrastructure Layer** (`infrastructure`): File loading, resolution,
//!   logging sinks and the HTTP entrypoint
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use aicontent::{ConfigAccessors, ConfigResolver, LoggingBootstrap};
//!
//! fn main() -> anyhow::Result<()> {
//!     let resolver = Arc::new(ConfigResolver::new("config"));
//!     LoggingBootstrap::new(Arc::clone(&resolver)).configure()?;
//!
//!     let accessors = ConfigAccessors::new(resolver);
//!     let settings = accessors.provider_settings(None)?;
//!     println!("{settings:?}");
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AppSettings, BrokerSettings, ConfigDocument, DocumentSlot, ProviderEntry, DEFAULT_PROVIDER,
};
pub use domain::{ConfigError, ConfigResult};
pub use infrastructure::config::{load_document, load_json, load_yaml, ConfigResolver};
pub use infrastructure::logging::{InterceptBridge, LoggingBootstrap, LoggingReport};
pub use services::ConfigAccessors;
