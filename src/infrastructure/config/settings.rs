//! Environment-derived settings
//!
//! Precedence (lowest to highest):
//! 1. Programmatic defaults (Serialized)
//! 2. Environment variables
//!
//! A `.env` file is folded into the environment by the binary before these
//! loaders run.

use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;

use crate::domain::models::{AppSettings, BrokerSettings};

/// Loads the settings consumed by the web and broker glue.
pub struct SettingsLoader;

impl SettingsLoader {
    /// `APP_NAME` and `DEBUG`, matched case-insensitively.
    pub fn app_settings() -> Result<AppSettings> {
        Figment::new()
            .merge(Serialized::defaults(AppSettings::default()))
            .merge(Env::raw().only(&["app_name", "debug"]))
            .extract()
            .context("Failed to extract application settings")
    }

    /// `CELERY_BROKER_URL` and `CELERY_RESULT_BACKEND`.
    ///
    /// The serialization contract is fixed and not read from the environment.
    pub fn broker_settings() -> Result<BrokerSettings> {
        Figment::new()
            .merge(Serialized::defaults(BrokerSettings::default()))
            .merge(Env::prefixed("CELERY_").only(&["broker_url", "result_backend"]))
            .extract()
            .context("Failed to extract broker settings")
    }
}
