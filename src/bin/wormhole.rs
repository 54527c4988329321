use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::Level;
use wormhole::database::{DatabaseManager, SchemaManager, TracingSink, LATEST_VERSION};
use wormhole::{get_database_info, WormholeConfig};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.wormhole/wormhole.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output as JSON
    #[clap(long)]
    json: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bring the database up to the latest schema version
    Migrate {
        /// Database file to migrate instead of the configured one
        #[clap(long)]
        db: Option<PathBuf>,
    },

    /// Print the installed schema version (-1 when unversioned)
    Version {
        /// Database file to inspect instead of the configured one
        #[clap(long)]
        db: Option<PathBuf>,
    },

    /// Show database file, schema status and table row counts
    Info,

    /// Show the effective configuration
    Config,
}

fn database_path(config: &WormholeConfig, db: Option<PathBuf>) -> PathBuf {
    db.unwrap_or_else(|| PathBuf::from(config.database_path()))
}

fn log_level(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = WormholeConfig::new(&cli.config)?;

    match cli.command {
        Commands::Migrate { db } => {
            let path = database_path(&config, db);
            let mut manager = DatabaseManager::with_sink(&path, Arc::new(TracingSink));
            manager
                .migrate()
                .map_err(|e| anyhow!("Migration of {} failed: {}", path.display(), e))?;
            let version = manager.schema_version();
            manager.close_connection()?;

            if cli.json {
                println!(
                    "{}",
                    json!({"path": path.display().to_string(), "version": version})
                );
            } else {
                println!(
                    "{} is at schema v{} (latest v{})",
                    path.display(),
                    version,
                    LATEST_VERSION
                );
            }
        }
        Commands::Version { db } => {
            let path = database_path(&config, db);
            if !path.exists() {
                return Err(anyhow!("Database file {} does not exist", path.display()));
            }
            let mut manager = DatabaseManager::with_sink(&path, Arc::new(TracingSink));
            let mut schema = SchemaManager::new(&mut manager);
            let version = schema.current_version();
            let status = schema.check_status();

            if cli.json {
                println!(
                    "{}",
                    json!({"version": version, "status": status.to_string()})
                );
            } else {
                println!("{}", version);
            }
        }
        Commands::Info => {
            let info = get_database_info(&config);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", info.summary());
            }
        }
        Commands::Config => {
            if cli.json {
                println!(
                    "{}",
                    json!({
                        "config_file": WormholeConfig::config_file_path(),
                        "data_dir": config.data_dir,
                        "database_path": config.database_path(),
                    })
                );
            } else {
                println!("Config File:        {}", WormholeConfig::config_file_path());
                println!("{}", config.summary());
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.debug))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flag_enables_debug_events() {
        let cli = Cli::try_parse_from(["wormhole", "--debug", "info"]).unwrap();
        assert_eq!(log_level(cli.debug), Level::DEBUG);

        let cli = Cli::try_parse_from(["wormhole", "info"]).unwrap();
        assert_eq!(log_level(cli.debug), Level::WARN);
    }
}
