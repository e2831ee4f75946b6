//! Implementation of the `aicontent serve` command.

use anyhow::Result;
use clap::Args;
use std::sync::Arc;

use crate::infrastructure::config::SettingsLoader;
use crate::infrastructure::http;
use crate::services::ConfigAccessors;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,
}

pub async fn execute(args: ServeArgs, accessors: Arc<ConfigAccessors>) -> Result<()> {
    let settings = SettingsLoader::app_settings()?;
    http::serve(accessors, settings, &args.host, args.port).await
}
