//! AquaSense CLI
//!
//! Console dashboard for a water-quality monitoring service, a simulated
//! monitoring service, and one-shot dispensing actions.

use std::path::PathBuf;

use aquasense::config::port_from_env;
use aquasense::relay::ActionOutcome;
use aquasense::{load_config, Action, Config};
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "aquasense")]
#[command(about = "Water-quality monitoring dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Monitoring service base URL (overrides config file)
    #[arg(long)]
    server: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the service and render the dashboard on the console
    Watch,
    /// Serve the simulated monitoring service
    Simulate {
        /// Listen port (overrides PORT and the config file)
        #[arg(short, long)]
        port: Option<u16>,
        /// Seed for reproducible sensor drift
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Ask the service to propose a dispensing action
    Request {
        #[arg(long)]
        mineral: String,
        #[arg(long)]
        reason: String,
    },
    /// Approve the pending dispensing action
    Approve,
    /// Cancel the pending dispensing action
    Cancel,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, server={:?}, log_level={:?}, command={:?}",
        args.config,
        args.server,
        args.log_level,
        args.command
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(server) = args.server {
        config.server.base_url = server;
    }

    let action = match args.command {
        Command::Watch => {
            tracing::info!("Starting aquasense dashboard");
            aquasense::run_watch(config).await?;
            return Ok(());
        }
        Command::Simulate { port, seed } => {
            let port = match port {
                Some(port) => Some(port),
                None => port_from_env()?,
            };
            if let Some(port) = port {
                config.simulator.port = port;
            }
            if seed.is_some() {
                config.simulator.seed = seed;
            }
            tracing::info!("Starting simulated monitoring service");
            aquasense::run_simulator(config).await?;
            return Ok(());
        }
        Command::Request { mineral, reason } => Action::Request { mineral, reason },
        Command::Approve => Action::Approve,
        Command::Cancel => Action::Cancel,
    };

    match aquasense::run_action(config, action).await? {
        ActionOutcome::Completed { message } => {
            println!("{}", message.unwrap_or_else(|| "OK".to_string()));
            Ok(())
        }
        ActionOutcome::Rejected { status, message } => Err(format!(
            "{}: {}",
            status,
            message.unwrap_or_default()
        )
        .into()),
    }
}
