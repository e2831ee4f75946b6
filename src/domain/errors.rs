//! Domain errors for configuration resolution.

use std::path::{Path, PathBuf};

use thiserror::Error;

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a document's content could not be decoded into a mapping.
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("content is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("top-level value is a {found}, expected a mapping")]
    NotAMapping { found: &'static str },
}

/// Errors raised while loading or querying configuration documents.
///
/// None of these are recovered inside the crate: they are logged where they
/// arise and handed to the caller, which decides whether absence is fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("No configuration file found for provider: {name} (tried {})", format_candidates(.candidates))]
    DocumentNotFound {
        name: String,
        candidates: Vec<PathBuf>,
    },

    #[error("Failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseFailure,
    },

    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),

    #[error("Template group '{0}' not found.")]
    UnknownGroup(String),

    #[error("Template '{template}' not found in group '{group}'.")]
    UnknownTemplate { group: String, template: String },

    #[error("Invalid value for '{key}' in {document}: expected {expected}")]
    InvalidShape {
        document: &'static str,
        key: String,
        expected: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn parse(path: &Path, source: impl Into<ParseFailure>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    /// True for both a missing file and a logical name with no matching file.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. } | Self::DocumentNotFound { .. })
    }

    /// True when the document exists and decoded but a requested key is absent.
    pub const fn is_unknown_key(&self) -> bool {
        matches!(
            self,
            Self::UnknownProvider(_) | Self::UnknownGroup(_) | Self::UnknownTemplate { .. }
        )
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
