//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for forward and reverse geocoding with
//! structured address details.
//! Rate limit: 1 request per second (enforced by User-Agent requirement),
//! which is why callers should route requests through the serializer.

use crate::constants::api::NOMINATIM_URL;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geocode::{ForwardResolution, Geocoder, Placemark};
use serde::Deserialize;

const USER_AGENT: &str = "geotrack/0.1.0";

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
}

/// Nominatim response item (search and reverse share this shape)
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    address: NominatimAddress,
}

/// Structured address fields from `addressdetails=1`
#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
}

impl NominatimAddress {
    fn into_placemark(self) -> Placemark {
        Placemark {
            locality: self.city.or(self.town).or(self.village),
            administrative_area: self.state,
            postal_code: self.postcode,
        }
    }
}

impl NominatimGeocoder {
    /// Create a new Nominatim backend
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Parse lat/lng strings to coordinates
    fn parse_coords(lat: &str, lng: &str) -> Result<Coordinates> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid longitude: {}", lng)))?;
        Ok(Coordinates::new(lat, lng))
    }

    async fn fetch_place(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for NominatimGeocoder {
    async fn forward(&self, query: &str) -> Result<ForwardResolution> {
        let url = format!(
            "{}/search?q={}&format=json&addressdetails=1&limit=1",
            NOMINATIM_URL,
            urlencoding::encode(query)
        );

        let results: Vec<NominatimPlace> = self
            .fetch_place(&url)
            .await?
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        let Some(place) = results.into_iter().next() else {
            return Err(Error::Geocoding(format!("No matches for \"{}\"", query)));
        };

        let coordinate = Self::parse_coords(&place.lat, &place.lon)?;
        let placemark = place.address.into_placemark();
        Ok(ForwardResolution {
            coordinate,
            corrected_address: placemark.display_string(),
            placemark,
        })
    }

    async fn reverse(&self, coordinate: Coordinates) -> Result<Placemark> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            NOMINATIM_URL, coordinate.lat, coordinate.lng
        );

        let place: NominatimPlace = self
            .fetch_place(&url)
            .await?
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        Ok(place.address.into_placemark())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_coords() {
        let coords = NominatimGeocoder::parse_coords("39.7817", "-89.6501").unwrap();
        assert_relative_eq!(coords.lat, 39.7817, epsilon = 0.0001);
        assert_relative_eq!(coords.lng, -89.6501, epsilon = 0.0001);
    }

    #[test]
    fn test_parse_coords_invalid() {
        assert!(NominatimGeocoder::parse_coords("invalid", "0").is_err());
        assert!(NominatimGeocoder::parse_coords("0", "invalid").is_err());
    }

    #[test]
    fn test_backend_creation() {
        let backend = NominatimGeocoder::new();
        assert!(format!("{:?}", backend).contains("NominatimGeocoder"));
    }

    #[test]
    fn test_deserialize_search_response() {
        let body = r#"[{
            "lat": "39.7817213",
            "lon": "-89.6501481",
            "display_name": "Springfield, Sangamon County, Illinois, United States",
            "address": {
                "city": "Springfield",
                "county": "Sangamon County",
                "state": "Illinois",
                "postcode": "62701",
                "country": "United States"
            }
        }]"#;

        let places: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        let place = places.into_iter().next().unwrap();
        let placemark = place.address.into_placemark();

        assert_eq!(placemark.locality, Some("Springfield".to_string()));
        assert_eq!(placemark.administrative_area, Some("Illinois".to_string()));
        assert_eq!(placemark.postal_code, Some("62701".to_string()));
        assert_eq!(placemark.display_string(), "Springfield, Illinois, 62701");
    }

    #[test]
    fn test_deserialize_missing_address() {
        let body = r#"[{"lat": "1.0", "lon": "2.0"}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        let placemark = places.into_iter().next().unwrap().address.into_placemark();
        assert_eq!(placemark, Placemark::default());
    }

    #[test]
    fn test_locality_fallback() {
        let address = NominatimAddress {
            city: None,
            town: Some("Sleepy Hollow".to_string()),
            village: Some("Ignored".to_string()),
            state: Some("NY".to_string()),
            postcode: None,
        };
        let placemark = address.into_placemark();
        assert_eq!(placemark.locality, Some("Sleepy Hollow".to_string()));
        assert_eq!(placemark.display_string(), "Sleepy Hollow, NY");
    }
}
