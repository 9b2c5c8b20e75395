//! Gabinete Digital CLI
//!
//! Command-line interface for the Gabinete Digital API server.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod config;

use commands::{prepare_database, run_server};
use config::AppConfig;
use gd_observability::{init_logging_with_config, LoggingConfig};

const DEFAULT_CONFIG_PATH: &str = "gabinete.yaml";

#[derive(Parser)]
#[command(name = "gabinete")]
#[command(author = "Gabinete Digital Team")]
#[command(version)]
#[command(about = "Parliamentary office registry and Câmara dos Deputados aggregation API", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "GABINETE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Database URL, sqlite: or mysql:// (overrides DATABASE_URL)
        #[arg(short, long)]
        database: Option<String>,

        /// Validate configuration and exit without starting the server
        #[arg(long)]
        validate_only: bool,
    },

    /// Apply migrations and seed the default records
    Migrate {
        /// Database URL, sqlite: or mysql:// (overrides DATABASE_URL)
        #[arg(short, long)]
        database: Option<String>,
    },

    /// Show current configuration
    Config {
        /// Show secrets (redacted by default)
        #[arg(long)]
        show_secrets: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal outside development.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let explicit_path = cli.config.is_some();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = if explicit_path || config_path.exists() {
        AppConfig::load(&config_path)?
    } else {
        if cli.verbose {
            eprintln!("Using default configuration (no config file found)");
        }
        AppConfig::default()
    };
    config.apply_env()?;

    init_logging(&config, cli.verbose, cli.format)?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            database,
            validate_only,
        } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(database) = database {
                config.database.url = database;
            }
            cmd_serve(config, validate_only).await
        }
        Commands::Migrate { database } => {
            if let Some(database) = database {
                config.database.url = database;
            }
            cmd_migrate(config).await
        }
        Commands::Config { show_secrets } => cmd_config(config, show_secrets, cli.format),
    }
}

fn init_logging(config: &AppConfig, verbose: bool, format: OutputFormat) -> Result<()> {
    let log_format = if format == OutputFormat::Json {
        "json"
    } else {
        config.logging.format.as_str()
    };
    let mut logging = LoggingConfig::from_settings(&config.logging.level, log_format)
        .context("Invalid logging configuration")?;
    if verbose {
        logging.level = tracing::Level::DEBUG;
    }
    init_logging_with_config(logging).context("Failed to initialize logging")
}

async fn cmd_serve(config: AppConfig, validate_only: bool) -> Result<()> {
    println!("{}", "Validating configuration...".cyan());

    if let Err(err) = config.validate() {
        println!("  {} {}", "✗".red(), err);
        println!();
        println!(
            "{}",
            "Server startup aborted due to configuration errors. Fix the errors above and try again."
                .red()
                .bold()
        );
        std::process::exit(1);
    }

    if validate_only {
        println!();
        println!(
            "{}",
            "Configuration is valid. Server can be started."
                .green()
                .bold()
        );
        return Ok(());
    }

    println!();
    run_server(config).await
}

async fn cmd_migrate(config: AppConfig) -> Result<()> {
    println!("{}", "Synchronizing database schema...".cyan());

    let pool = prepare_database(&config).await?;
    pool.close().await;

    println!("{}", "Tables synchronized".green().bold());
    Ok(())
}

fn cmd_config(config: AppConfig, show_secrets: bool, format: OutputFormat) -> Result<()> {
    let config = if show_secrets {
        config
    } else {
        config.redact_secrets()
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", serde_yaml::to_string(&config)?);
    }

    Ok(())
}
