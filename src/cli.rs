//! Command line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::config::Config;

/// Version line with build date and commit.
#[cfg(not(feature = "release"))]
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("HACKTERM_BUILD_DATE"),
    ", commit ",
    env!("VERGEN_GIT_SHA"),
    ")"
);

/// Version line with build date only.
#[cfg(feature = "release")]
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("HACKTERM_BUILD_DATE"),
    ")"
);

/// Hacker terminal for the console
#[derive(Parser, Debug)]
#[command(name = "hackterm")]
#[command(about = "Hacker terminal: boot animation, scripted shell and glyph rain")]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    /// Command document (JSON) to load instead of the configured one
    #[arg(short, long, value_name = "PATH")]
    pub commands: Option<PathBuf>,

    /// Start with keystroke sounds off
    #[arg(long)]
    pub no_sound: bool,

    /// Start without the glyph rain
    #[arg(long)]
    pub no_rain: bool,

    /// Color theme (matrix, classic, ocean)
    #[arg(short, long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Log file (default: the user cache directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration if none exists
    Init,
}

impl Cli {
    /// Apply command line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(commands) = &self.commands {
            config.terminal.commands = commands.clone();
        }
        if let Some(theme) = &self.theme {
            config.terminal.theme = theme.clone();
        }
        if self.no_sound {
            config.sound.enabled = false;
        }
        if self.no_rain {
            config.effects.rain = false;
        }
    }
}
