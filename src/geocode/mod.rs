//! Geocoding module
//!
//! Defines the `Geocoder` seam over the host geocoding service, the
//! placemark/address types shared by both directions, and the request
//! serializer that rate-limits access to the backend.

pub mod nominatim;
pub mod serializer;

use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Structured address components for a resolved location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    /// City / town / village
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,

    /// State or province
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_area: Option<String>,

    /// Postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl Placemark {
    /// Format the display address, in priority order:
    /// city+state+postal > city+state > state alone > postal alone > empty
    pub fn display_string(&self) -> String {
        match (&self.locality, &self.administrative_area, &self.postal_code) {
            (Some(city), Some(state), Some(postal)) => format!("{}, {}, {}", city, state, postal),
            (Some(city), Some(state), None) => format!("{}, {}", city, state),
            (_, Some(state), _) => state.clone(),
            (_, None, Some(postal)) => postal.clone(),
            _ => String::new(),
        }
    }
}

/// Result of a forward geocode: the resolved coordinate plus the
/// geocoder-corrected address (which may differ from the query text)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardResolution {
    pub coordinate: Coordinates,
    pub corrected_address: String,
    pub placemark: Placemark,
}

/// Trait for geocoding backends
///
/// Treated as a black-box, possibly rate-limited remote dependency; callers
/// should go through the serializer rather than invoking a backend directly.
pub trait Geocoder: Send + Sync {
    /// Resolve an address string to a coordinate and corrected address
    fn forward(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<ForwardResolution>> + Send;

    /// Resolve a coordinate to a placemark
    fn reverse(
        &self,
        coordinate: Coordinates,
    ) -> impl std::future::Future<Output = Result<Placemark>> + Send;
}
