//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod locate;
pub mod resolve;
pub mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Location tracking and serialized geocoding toolkit
#[derive(Parser)]
#[command(name = "geotrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forward geocode an address to a coordinate
    Resolve(resolve::ResolveArgs),

    /// Reverse geocode a coordinate to an address
    Locate(locate::LocateArgs),

    /// Show persisted tracker state
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve(args) => resolve::run(args).await,
        Commands::Locate(args) => locate::run(args).await,
        Commands::Status(args) => status::run(args),
    }
}
