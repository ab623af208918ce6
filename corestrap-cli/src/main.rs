//! Developer toggle for automatic bootstrap.
//!
//! Reads and writes the same configuration asset the startup entry point
//! consumes, so a change here is visible on the next process start.

use clap::{Parser, Subcommand};
use corestrap::config::{ConfigStore, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "corestrap", version, about = "Configure automatic service bootstrap")]
struct Cli {
    /// Path to the configuration asset
    #[arg(long, short, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print whether bootstrap runs automatically
    Show,
    /// Run bootstrap automatically at startup
    Enable,
    /// Require bootstrap to be triggered manually
    Disable,
    /// Flip the current setting
    Toggle,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut store = ConfigStore::load(&cli.config)?;

    match cli.command {
        Command::Show => {}
        Command::Enable => {
            store.set_initialize_on_awake(true);
        }
        Command::Disable => {
            store.set_initialize_on_awake(false);
        }
        Command::Toggle => {
            store.toggle();
        }
    }

    if store.save()? {
        tracing::debug!("Wrote {}", store.path().display());
    }

    println!("initialize_on_awake = {}", store.initialize_on_awake());
    Ok(())
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
    fn test_parses_config_override() {
        let cli = Cli::try_parse_from(["corestrap", "--config", "a/b.json", "disable"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("a/b.json"));
        assert!(matches!(cli.command, Command::Disable));
    }
}
