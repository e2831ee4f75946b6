//! Implementation of the `aicontent broker` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::BrokerSettings;
use crate::infrastructure::config::SettingsLoader;

#[derive(Args, Debug)]
pub struct BrokerArgs {}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct BrokerOutput(pub BrokerSettings);

impl CommandOutput for BrokerOutput {
    fn to_human(&self) -> String {
        let settings = &self.0;
        [
            format!("App:              {}", settings.app_name),
            format!("Broker:           {}", settings.broker_url),
            format!("Result backend:   {}", settings.result_backend),
            format!("Task modules:     {}", settings.include.join(", ")),
            format!("Serializer:       {}", settings.task_serializer),
            format!("Accepted content: {}", settings.accept_content.join(", ")),
            format!("Timezone:         {} (utc: {})", settings.timezone, settings.enable_utc),
        ]
        .join("\n")
    }
}

pub fn execute(_args: BrokerArgs, json_mode: bool) -> Result<()> {
    let settings = SettingsLoader::broker_settings()?;
    output(&BrokerOutput(settings), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_output_lists_locations() {
        let human = BrokerOutput(BrokerSettings::default()).to_human();
        assert!(human.contains("Broker:           redis://redis:6379/0"));
        assert!(human.contains("Result backend:   redis://redis:6379/1"));
        assert!(human.contains("Task modules:     tasks"));
    }
}
