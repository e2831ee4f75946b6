//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{
    broker::BrokerArgs, provider::ProviderArgs, serve::ServeArgs, template::TemplateArgs,
};

#[derive(Parser, Debug)]
#[command(name = "aicontent")]
#[command(about = "AI content service: configuration, prompt templates and HTTP API", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding model_config, prompt_templates and logging_config
    #[arg(long, global = true, env = "AICONTENT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Show the default provider, or the settings of one provider
    Provider(ProviderArgs),

    /// Print one prompt template
    Template(TemplateArgs),

    /// Show the background-task broker settings
    Broker(BrokerArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_template_with_globals() {
        let cli = Cli::try_parse_from([
            "aicontent",
            "template",
            "blog",
            "intro",
            "--json",
            "--config-dir",
            "/srv/config",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.config_dir, Some(PathBuf::from("/srv/config")));
        match cli.command {
            Commands::Template(args) => {
                assert_eq!(args.group, "blog");
                assert_eq!(args.template, "intro");
            }
            other => panic!("Expected template command, got {other:?}"),
        }
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["aicontent", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, "0.0.0.0");
                assert_eq!(args.port, 8000);
            }
            other => panic!("Expected serve command, got {other:?}"),
        }
    }
}
