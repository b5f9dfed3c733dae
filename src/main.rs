mod config;
mod database;
mod entities;
mod formatting;
mod forms;
mod http_server;
mod logging;
mod services;
mod views;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config, database::Database, http_server::app::HttpServerConfig,
    logging::setup_logging,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "SHOWBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Console log level
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file, overrides `log_file` in the config
    #[arg(long, env = "SHOWBOOK_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn is_directory(s: &str) -> Result<PathBuf, String> {
    let p: PathBuf = s.into();
    if p.is_dir() {
        Ok(p)
    } else {
        Err(format!("`{}` is not an existing directory", s))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the venue and artist directory
    Serve {
        /// The port to run the server on, overrides the config
        #[arg(short, long, env = "SHOWBOOK_HTTP_PORT")]
        port: Option<u16>,

        /// The address to bind to, overrides the config
        #[arg(short, long, env = "SHOWBOOK_BIND_ADDRESS")]
        bind: Option<String>,

        /// The SQLite database file, overrides the config
        #[arg(long, env = "SHOWBOOK_DATABASE")]
        database: Option<PathBuf>,

        /// Directory holding the stylesheets and images served under /static, overrides the config
        #[arg(long, value_parser = is_directory, env = "SHOWBOOK_STATIC_DIR")]
        static_dir: Option<PathBuf>,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// The SQLite database file, overrides the config
        #[arg(long, env = "SHOWBOOK_DATABASE")]
        database: Option<PathBuf>,
    },

    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load showbook config")?;

    let log_file = args.log_file.clone().or_else(|| config.log_file_path());
    setup_logging(args.log_level, log_file, args.log_file_level)?;

    log::debug!("Showbook starting");

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                log::info!("Default config created at: {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Migrate { database } => {
            let database_path = database.unwrap_or_else(|| config.database_path());
            Database::open(&database_path).await?;
            log::info!("Database is up to date: {}", database_path.display());
        }
        Commands::Serve {
            port,
            bind,
            database,
            static_dir,
        } => {
            let database_path = database.unwrap_or_else(|| config.database_path());
            let database = Database::open(&database_path).await?;

            let static_dir = static_dir.unwrap_or_else(|| config.static_dir_path());
            if !static_dir.is_dir() {
                log::warn!(
                    "Static directory not found, pages will render unstyled: {}",
                    static_dir.display()
                );
            }

            let port = port.unwrap_or(config.port);
            let bind_address = bind.unwrap_or(config.bind_address);

            log::info!("Starting HTTP server on {}:{}", bind_address, port);
            http_server::app::start(HttpServerConfig {
                bind_address,
                port,
                database,
                static_dir,
            })
            .await?;
        }
    }

    Ok(())
}
