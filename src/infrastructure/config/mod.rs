//! Configuration management infrastructure
//!
//! - YAML / JSON document loading
//! - Cascading name resolution (`.yaml`, `.yml`, `.json`)
//! - Process-lifetime document caching
//! - Environment-derived settings

pub mod loader;
pub mod resolver;
pub mod settings;

pub use loader::{load_document, load_json, load_yaml};
pub use resolver::{CacheSlot, ConfigResolver, CONFIG_DIR_ENV, DEFAULT_CONFIG_DIR, SEARCH_EXTENSIONS};
pub use settings::SettingsLoader;
