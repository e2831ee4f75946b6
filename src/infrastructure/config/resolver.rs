//! Cascading document resolution and per-document caching
//!
//! A logical name `P` resolves to the first existing file of `P.yaml`,
//! `P.yml`, `P.json` inside the config directory. Formats are never merged.

use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::loader::load_document;
use crate::domain::errors::{ConfigError, ConfigResult};
use crate::domain::models::{ConfigDocument, DocumentSlot};

/// Extensions tried in order for a logical document name.
pub const SEARCH_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Environment variable naming the config directory.
pub const CONFIG_DIR_ENV: &str = "AICONTENT_CONFIG_DIR";

/// Default config directory, relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Lazily populated holder for one cached document.
///
/// The loader runs at most once successfully; concurrent first readers block
/// until it finishes and then share the same `Arc`. A failed load leaves the
/// slot empty so the error reaches every caller that asks.
#[derive(Debug, Default)]
pub struct CacheSlot {
    cell: OnceCell<Arc<ConfigDocument>>,
}

impl CacheSlot {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn get_or_load<F>(&self, load: F) -> ConfigResult<Arc<ConfigDocument>>
    where
        F: FnOnce() -> ConfigResult<ConfigDocument>,
    {
        self.cell
            .get_or_try_init(|| load().map(Arc::new))
            .map(Arc::clone)
    }

    pub fn get(&self) -> Option<Arc<ConfigDocument>> {
        self.cell.get().cloned()
    }

    pub fn is_populated(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Resolves logical configuration names to documents in one directory.
///
/// Owns one [`CacheSlot`] per [`DocumentSlot`]; share it behind an `Arc`
/// so every consumer sees the same cached documents.
#[derive(Debug)]
pub struct ConfigResolver {
    config_dir: PathBuf,
    slots: [CacheSlot; DocumentSlot::ALL.len()],
}

impl ConfigResolver {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            slots: [CacheSlot::new(), CacheSlot::new()],
        }
    }

    /// Resolver rooted at `$AICONTENT_CONFIG_DIR`, or `./config`.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(CONFIG_DIR_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR), PathBuf::from);
        Self::new(dir)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Candidate paths for `name`, in search order.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        SEARCH_EXTENSIONS
            .iter()
            .map(|ext| self.config_dir.join(format!("{name}.{ext}")))
            .collect()
    }

    /// First existing candidate for `name`, if any.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        self.candidates(name).into_iter().find(|p| p.exists())
    }

    /// Load the document for a logical name without caching.
    ///
    /// `None` yields an empty document: optional configuration layers may
    /// simply not be named.
    pub fn resolve(&self, name: Option<&str>) -> ConfigResult<ConfigDocument> {
        let Some(name) = name else {
            warn!("resolve called without a provider name; returning empty config");
            return Ok(ConfigDocument::new());
        };

        debug!(provider = name, dir = %self.config_dir.display(), "Loading config provider");

        let candidates = self.candidates(name);
        let Some(path) = candidates.iter().find(|p| p.exists()) else {
            error!(provider = name, "No configuration file found for provider");
            return Err(ConfigError::DocumentNotFound {
                name: name.to_string(),
                candidates,
            });
        };

        load_document(path)
    }

    /// Cached document for `slot`, loaded on first access.
    pub fn cached(&self, slot: DocumentSlot) -> ConfigResult<Arc<ConfigDocument>> {
        self.slots[slot.index()].get_or_load(|| {
            debug!(document = %slot, "Populating config cache");
            self.resolve(Some(slot.name()))
        })
    }

    /// Whether `slot` has already been loaded.
    pub fn is_cached(&self, slot: DocumentSlot) -> bool {
        self.slots[slot.index()].is_populated()
    }

    /// Model/provider configuration (`model_config`), cached.
    pub fn model_config(&self) -> ConfigResult<Arc<ConfigDocument>> {
        self.cached(DocumentSlot::ModelConfig)
    }

    /// Prompt template groups (`prompt_templates`), cached.
    pub fn prompt_templates(&self) -> ConfigResult<Arc<ConfigDocument>> {
        self.cached(DocumentSlot::PromptTemplates)
    }
}
