//! geotrack CLI entry point
//!
//! Location tracking and serialized geocoding toolkit

use geotrack::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
