//! Resolve command handler
//!
//! Forward geocodes an address string through the serializer.

use crate::error::Result;
use crate::geocode::nominatim::NominatimGeocoder;
use crate::geocode::serializer::GeocodeSerializer;
use clap::Args;

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Address to resolve (e.g. "Springfield, IL")
    pub address: String,
}

/// Run the resolve command
pub async fn run(args: ResolveArgs) -> Result<()> {
    let serializer = GeocodeSerializer::spawn(NominatimGeocoder::new());
    let resolution = serializer.forward(&args.address).await?;

    let address = if resolution.corrected_address.is_empty() {
        args.address.as_str()
    } else {
        resolution.corrected_address.as_str()
    };

    println!("Address:    {}", address);
    println!(
        "Coordinate: {}, {}",
        resolution.coordinate.lat, resolution.coordinate.lng
    );

    Ok(())
}
