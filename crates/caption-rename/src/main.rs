//! caption-rename CLI - name image files after what they show.
//!
//! Each image in a directory is captioned by a vision-language model and then
//! renamed (or copied) to a filesystem-safe name derived from the caption.
//!
//! # Usage
//!
//! ```bash
//! # Rename in place
//! caption-rename rename ./photos --in-place
//!
//! # Copy into a separate directory, forcing CPU inference
//! caption-rename rename ./photos --output-path ./named --device cpu
//!
//! # Use an OpenAI-compatible endpoint and keep a report
//! caption-rename rename ./photos --in-place --provider openai --report run.json
//!
//! # View configuration
//! caption-rename config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// caption-rename - Rename images after captions from a vision-language model.
#[derive(Parser, Debug)]
#[command(name = "caption-rename")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Caption every image in a directory and rename or copy it
    Rename(cli::rename::RenameArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match caption_rename_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default logging settings. Check your config file with `caption-rename config path`."
            );
            caption_rename_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("caption-rename v{}", caption_rename_core::VERSION);

    match cli.command {
        Commands::Rename(args) => cli::rename::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
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
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["caption-rename", "config", "path", "-v", "--json-logs"])
            .unwrap();
        assert!(cli.verbose);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::Config(_)));
    }

    #[test]
    fn test_rename_subcommand() {
        let cli = Cli::try_parse_from(["caption-rename", "rename", "./photos", "--in-place"])
            .unwrap();
        match cli.command {
            Commands::Rename(args) => assert!(args.in_place),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
