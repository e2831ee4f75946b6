pub mod config;
pub mod settings;

pub use config::{
    value_kind, ConfigDocument, DocumentSlot, ProviderEntry, DEFAULT_PROVIDER, LOGGING_CONFIG,
};
pub use settings::{AppSettings, BrokerSettings};
