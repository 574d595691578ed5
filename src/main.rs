mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use formatbox::config::Config;
use formatbox::formats::FormatRegistry;
use formatbox::observability;

#[tokio::main]
async fn main() -> Result<(), commands::AnyError> {
    observability::init_tracing();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let registry = FormatRegistry::from_config(&config.formats);

    match cli.command {
        Commands::Read(args) => commands::read(&config, &registry, args).await?,
        Commands::Write(args) => commands::write(&config, &registry, args).await?,
        Commands::Formats => commands::formats(&registry)?,
        Commands::Config => commands::show_config(&config)?,
    }

    Ok(())
}
