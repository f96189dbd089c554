//! hackterm entry point.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;

use hackterm::cli::{Cli, Commands, ConfigCommands};
use hackterm::{logging, tui, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Completions { shell }) => commands::completions::handle(*shell),
        Some(Commands::Config(ConfigCommands::Path)) => commands::config::handle_path(),
        Some(Commands::Config(ConfigCommands::Init)) => commands::config::handle_init(),
        Some(Commands::Config(ConfigCommands::Show)) => {
            let config = load_config(&cli)?;
            commands::config::handle_show(&config)
        }
        None => {
            let log_file = logging::init(cli.log_file.as_deref());
            let config = load_config(&cli)?;
            if let Some(path) = &log_file {
                tracing::debug!("logging to {}", path.display());
            }
            tui::run(config).await
        }
    }
}

/// The user config with command line overrides applied.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().context("Failed to load config")?;
    cli.apply(&mut config);
    Ok(config)
}
