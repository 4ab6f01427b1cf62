//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod locate;
pub mod reverse;
pub mod ride;
pub mod search;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Location resolution and simulated ride tracking
#[derive(Parser)]
#[command(name = "ride-sim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the top match for a place name
    Search(search::SearchArgs),

    /// Look up the address of a coordinate
    Reverse(reverse::ReverseArgs),

    /// Resolve the current device location
    Locate(locate::LocateArgs),

    /// Book a ride and optionally simulate it
    Ride(ride::RideArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Install the tracing subscriber
///
/// `RUST_LOG` overrides `default_filter`. Logs go to stderr so command
/// output on stdout stays clean.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve(_) => init_logging("info"),
        _ => init_logging("warn"),
    }

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Reverse(args) => reverse::run(args).await,
        Commands::Locate(args) => locate::run(args).await,
        Commands::Ride(args) => ride::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}
