//! Typed lookups over the cached configuration documents.
//!
//! Consumers ask for "the settings of provider X" or "template T of group G"
//! instead of walking raw mappings. Every lookup reads through the
//! resolver's cache, so files are parsed at most once per process.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::domain::errors::{ConfigError, ConfigResult};
use crate::domain::models::{value_kind, DocumentSlot, ProviderEntry, DEFAULT_PROVIDER};
use crate::infrastructure::config::ConfigResolver;

const DEFAULT_PROVIDER_KEY: &str = "default_provider";
const PROVIDERS_KEY: &str = "providers";

/// Read-only access to provider settings and prompt templates.
#[derive(Debug, Clone)]
pub struct ConfigAccessors {
    resolver: Arc<ConfigResolver>,
}

impl ConfigAccessors {
    pub const fn new(resolver: Arc<ConfigResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    /// Name of the provider to use when none is requested.
    ///
    /// Falls back to [`DEFAULT_PROVIDER`] when the key is missing, empty or
    /// not a string, so callers always get a usable name.
    ///
    /// # Errors
    /// Propagates a missing or unparseable `model_config` document.
    pub fn default_provider(&self) -> ConfigResult<String> {
        let model_config = self.resolver.model_config()?;
        let provider = match model_config.get(DEFAULT_PROVIDER_KEY) {
            Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
            Some(other) => {
                warn!(
                    found = value_kind(other),
                    fallback = DEFAULT_PROVIDER,
                    "default_provider is not a usable name"
                );
                DEFAULT_PROVIDER.to_string()
            }
            None => DEFAULT_PROVIDER.to_string(),
        };
        Ok(provider)
    }

    /// Settings entry for `provider`, or for the default provider when `None`.
    ///
    /// The entry is returned exactly as written; nothing is merged in.
    ///
    /// # Errors
    /// - [`ConfigError::UnknownProvider`] if the name is not under `providers`
    /// - [`ConfigError::InvalidShape`] if `providers` or the entry is not a mapping
    pub fn provider_settings(&self, provider: Option<&str>) -> ConfigResult<ProviderEntry> {
        let name = match provider {
            Some(name) => name.to_string(),
            None => self.default_provider()?,
        };

        let model_config = self.resolver.model_config()?;
        let providers = match model_config.get(PROVIDERS_KEY) {
            None => return Err(logged(ConfigError::UnknownProvider(name))),
            Some(Value::Object(providers)) => providers,
            Some(_) => {
                return Err(logged(ConfigError::InvalidShape {
                    document: DocumentSlot::ModelConfig.name(),
                    key: PROVIDERS_KEY.to_string(),
                    expected: "a mapping of provider names",
                }))
            }
        };

        match providers.get(&name) {
            Some(Value::Object(entry)) => {
                debug!(provider = %name, "Resolved provider settings");
                Ok(entry.clone())
            }
            Some(_) => Err(logged(ConfigError::InvalidShape {
                document: DocumentSlot::ModelConfig.name(),
                key: format!("{PROVIDERS_KEY}.{name}"),
                expected: "a settings mapping",
            })),
            None => Err(logged(ConfigError::UnknownProvider(name))),
        }
    }

    /// Body of `template` within `group`.
    ///
    /// The group is checked before the template so the error names the level
    /// that is missing.
    ///
    /// # Errors
    /// - [`ConfigError::UnknownGroup`] if the group is absent
    /// - [`ConfigError::UnknownTemplate`] if the group lacks the template
    /// - [`ConfigError::InvalidShape`] if the group or body has the wrong type
    pub fn prompt_template(&self, group: &str, template: &str) -> ConfigResult<String> {
        let templates = self.resolver.prompt_templates()?;

        let entries = match templates.get(group) {
            None => return Err(logged(ConfigError::UnknownGroup(group.to_string()))),
            Some(Value::Object(entries)) => entries,
            Some(_) => {
                return Err(logged(ConfigError::InvalidShape {
                    document: DocumentSlot::PromptTemplates.name(),
                    key: group.to_string(),
                    expected: "a mapping of template names",
                }))
            }
        };

        match entries.get(template) {
            None => Err(logged(ConfigError::UnknownTemplate {
                group: group.to_string(),
                template: template.to_string(),
            })),
            Some(Value::String(body)) => Ok(body.clone()),
            Some(_) => Err(logged(ConfigError::InvalidShape {
                document: DocumentSlot::PromptTemplates.name(),
                key: format!("{group}.{template}"),
                expected: "a template string",
            })),
        }
    }
}

/// Unknown names are the caller's mistake; a wrong shape is a broken file.
fn logged(err: ConfigError) -> ConfigError {
    if err.is_unknown_key() {
        warn!(error = %err, "Configuration lookup failed");
    } else {
        error!(error = %err, "Configuration lookup failed");
    }
    err
}
