//! aicontent CLI entry point.

use clap::Parser;
use std::sync::Arc;

use aicontent::cli::{commands, handle_error, Cli, Commands};
use aicontent::infrastructure::logging::{self, LoggingBootstrap};
use aicontent::{ConfigAccessors, ConfigResolver};

#[tokio::main]
async fn main() {
    // A missing .env is normal outside development.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let resolver = Arc::new(
        cli.config_dir
            .clone()
            .map_or_else(ConfigResolver::from_env, ConfigResolver::new),
    );

    // Logging first, so every later step reports through the configured sinks.
    if let Err(err) = LoggingBootstrap::new(Arc::clone(&resolver)).configure() {
        eprintln!("Logging unavailable: {err}");
    }

    let accessors = Arc::new(ConfigAccessors::new(resolver));

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, accessors).await,
        Commands::Provider(args) => commands::provider::execute(args, &accessors, cli.json),
        Commands::Template(args) => commands::template::execute(args, &accessors, cli.json),
        Commands::Broker(args) => commands::broker::execute(args, cli.json),
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
    logging::shutdown();
}
