//! Domain layer
//!
//! Configuration document types, application settings, and the error
//! taxonomy shared by every configuration consumer.

pub mod errors;
pub mod models;

pub use errors::{ConfigError, ConfigResult, ParseFailure};
