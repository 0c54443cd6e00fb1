//! docshelf CLI
//!
//! Command-line interface for docshelf - documents and voice recordings.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;

use docshelf_core::{Config, Library, LibraryError};

mod commands;
mod logging;
mod output;
mod platform;
mod prompt;

use commands::settings::SettingKey;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "docshelf")]
#[command(about = "docshelf - Local library of documents and voice recordings")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List documents
    #[command(alias = "ls")]
    List {
        /// Only show documents whose name contains this text
        #[arg(short, long, value_name = "TEXT")]
        filter: Option<String>,
    },
    /// Search documents by name
    Search {
        /// Search query (case-insensitive)
        query: String,
    },
    /// Import a file into the library
    #[command(alias = "import")]
    Add {
        /// File to import
        path: PathBuf,
    },
    /// Show document details
    Show {
        /// Document name
        id: String,
    },
    /// Open a document with the system handler
    Share {
        /// Document name
        id: String,
    },
    /// Delete a document
    #[command(alias = "rm")]
    Delete {
        /// Document name
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Record a voice note
    Record {
        /// Stop automatically after this many seconds
        #[arg(long, value_name = "SECS")]
        max_secs: Option<u64>,
    },
    /// Delete every document
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum SettingsCommands {
    /// Show current settings
    Show,
    /// Flip a setting on or off
    Toggle {
        #[arg(value_enum)]
        key: SettingKey,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, recorder, recording_format, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    match run(cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            if let Some(hint) = e
                .downcast_ref::<LibraryError>()
                .and_then(LibraryError::recovery_suggestion)
            {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let config_path = cli.config.as_ref();

    // Config commands work even when the data directory is unusable
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init_logging(&config);
    let mut library = Library::open_with_config(config);

    match cli.command {
        Commands::List { filter } => commands::document::list(&library, filter, output),
        Commands::Search { query } => commands::document::search(&library, query, output),
        Commands::Add { path } => commands::document::add(&library, path, output),
        Commands::Show { id } => commands::document::show(&library, id, output),
        Commands::Share { id } => commands::document::share(&library, id, output),
        Commands::Delete { id, yes } => commands::document::delete(&library, id, yes, output),
        Commands::Record { max_secs } => {
            commands::record::record(&library, max_secs, output).await
        }
        Commands::Clear { yes } => commands::document::clear(&library, yes, output),
        Commands::Settings { command } => match command {
            Some(SettingsCommands::Show) | None => commands::settings::show(&library, output),
            Some(SettingsCommands::Toggle { key }) => {
                commands::settings::toggle(&mut library, key, output)
            }
        },
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_toggle() {
        let cli = Cli::try_parse_from(["docshelf", "settings", "toggle", "dark-mode"]).unwrap();
        match cli.command {
            Commands::Settings {
                command: Some(SettingsCommands::Toggle { key }),
            } => assert_eq!(key, SettingKey::DarkMode),
            _ => panic!("expected settings toggle"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["docshelf", "list", "--json", "-f", "report"]).unwrap();
        assert!(cli.json);
        assert!(!cli.quiet);
        match cli.command {
            Commands::List { filter } => assert_eq!(filter.as_deref(), Some("report")),
            _ => panic!("expected list"),
        }
    }
}
