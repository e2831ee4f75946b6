//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use aicontent::{ConfigAccessors, ConfigResolver};
use tempfile::TempDir;

pub const MODEL_CONFIG: &str = "\
default_provider: openai
providers:
  openai:
    model: gpt-x
    temperature: 0.7
  anthropic:
    model: claude-x
    max_tokens: 1024
";

pub const PROMPT_TEMPLATES: &str = "\
blog:
  intro: \"Write an engaging introduction about {topic}.\"
  outline: \"Outline a post on {topic} with {sections} sections.\"
email:
  welcome: \"Welcome {name}!\"
";

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `content` to `dir/name`, creating parents as needed.
pub fn write_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(path, content).expect("Failed to write fixture file");
}

/// Config directory populated with the standard model and template documents.
pub fn populated_config_dir() -> TempDir {
    let dir = temp_dir();
    write_file(dir.path(), "model_config.yaml", MODEL_CONFIG);
    write_file(dir.path(), "prompt_templates.yaml", PROMPT_TEMPLATES);
    dir
}

pub fn resolver_for(dir: &Path) -> Arc<ConfigResolver> {
    Arc::new(ConfigResolver::new(dir))
}

pub fn accessors_for(dir: &Path) -> ConfigAccessors {
    ConfigAccessors::new(resolver_for(dir))
}
