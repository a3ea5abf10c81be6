//! Locate command handler
//!
//! Reverse geocodes a coordinate pair through the serializer.

use crate::coord::Coordinates;
use crate::error::Result;
use crate::geocode::nominatim::NominatimGeocoder;
use crate::geocode::serializer::GeocodeSerializer;
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let coordinate = Coordinates::new(args.lat, args.lng);
    coordinate.validate()?;

    let serializer = GeocodeSerializer::spawn(NominatimGeocoder::new());
    let placemark = serializer.reverse(coordinate).await?;

    let display = placemark.display_string();
    if display.is_empty() {
        println!("No address found for {}, {}", coordinate.lat, coordinate.lng);
    } else {
        println!("Address: {}", display);
    }
    if let Some(postal_code) = &placemark.postal_code {
        println!("Postal:  {}", postal_code);
    }

    Ok(())
}
