//! Implementation of the `aicontent provider` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{indent, output, CommandOutput};
use crate::domain::models::ProviderEntry;
use crate::services::ConfigAccessors;

#[derive(Args, Debug)]
pub struct ProviderArgs {
    /// Provider to show (defaults to the configured default provider)
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProviderOutput {
    pub provider: String,
    pub is_default: bool,
    pub settings: ProviderEntry,
}

impl CommandOutput for ProviderOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![if self.is_default {
            format!("Provider: {} (default)", self.provider)
        } else {
            format!("Provider: {}", self.provider)
        }];

        if self.settings.is_empty() {
            lines.push("  (no settings)".to_string());
        } else {
            let body = serde_yaml::to_string(&self.settings).unwrap_or_default();
            lines.push(indent(body.trim_end(), 2));
        }
        lines.join("\n")
    }
}

pub fn execute(args: ProviderArgs, accessors: &ConfigAccessors, json_mode: bool) -> Result<()> {
    let result = run(args, accessors)?;
    output(&result, json_mode);
    Ok(())
}

pub(crate) fn run(args: ProviderArgs, accessors: &ConfigAccessors) -> Result<ProviderOutput> {
    let default = accessors.default_provider()?;
    let provider = args.name.unwrap_or_else(|| default.clone());
    let settings = accessors.provider_settings(Some(&provider))?;

    Ok(ProviderOutput {
        is_default: provider == default,
        provider,
        settings,
    })
}
