//! cmdgate CLI
//!
//! Command-line interface for the command gateway

use clap::{Parser, Subcommand};
use cmdgate_core::logging_facility::{init, Profile};
use cmdgate_engine::GatewayConfig;
use std::path::PathBuf;

mod commands;
mod restart;

#[derive(Debug, Parser)]
#[command(name = "cmdgate")]
#[command(about = "cmdgate - Persistent command queue with a polling dispatcher", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "CMDGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the queue, logs and memory (overrides the config file)
    #[arg(long, global = true, env = "CMDGATE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Logging profile: development, production or test
    #[arg(long, global = true, env = "CMDGATE_LOG_PROFILE", default_value = "development")]
    log_profile: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Drain and execute queued commands in the foreground
    Run(commands::run::RunArgs),
    /// Serve the HTTP API (with the dispatcher unless disabled)
    Serve(commands::serve::ServeArgs),
    /// Add a command to the queue
    Submit(commands::submit::SubmitArgs),
    /// Show the queue without consuming it
    Status,
    /// Empty the queue
    Clear,
    /// Show recent execution records
    Log(commands::log::LogArgs),
}

impl Cli {
    fn gateway_config(&self) -> Result<GatewayConfig, Box<dyn std::error::Error>> {
        let mut config = GatewayConfig::load(self.config.as_deref())?;
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        Ok(config)
    }
}

fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: could not load .env: {}", e);
        }
    }

    let cli = Cli::parse();
    init(Profile::from_name(&cli.log_profile));

    let result = cli.gateway_config().and_then(|config| match cli.command {
        Commands::Run(args) => commands::run::execute(args, config),
        Commands::Serve(args) => commands::serve::execute(args, config),
        Commands::Submit(args) => commands::submit::execute(args, config),
        Commands::Status => commands::status::execute(config),
        Commands::Clear => commands::clear::execute(config),
        Commands::Log(args) => commands::log::execute(args, config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
