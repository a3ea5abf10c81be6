//! Status command handler
//!
//! Shows the persisted tracker state.

use crate::error::Result;
use crate::store::Store;
use crate::tracker::TrackerMode;
use clap::Args;
use std::path::PathBuf;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Inspect a specific state file instead of the default
    #[arg(long)]
    pub store: Option<PathBuf>,
}

/// Run the status command
pub fn run(args: StatusArgs) -> Result<()> {
    let store = match args.store {
        Some(path) => Store::load_from(path)?,
        None => Store::load()?,
    };

    println!("geotrack v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("State file: {}", store.path().display());
    println!(
        "Mode:       {}",
        TrackerMode::from_flag(store.use_custom_location())
    );

    match store.last_coordinates() {
        Some(coordinate) => {
            println!(
                "Last fix:   {}, {}",
                coordinate.lat, coordinate.lng
            );
        }
        None => println!("Last fix:   none"),
    }

    Ok(())
}
