//! CLI command implementations.

pub mod broker;
pub mod provider;
pub mod serve;
pub mod template;
