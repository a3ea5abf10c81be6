//! Coordinates and location snapshots
//!
//! `Coordinates` is the immutable coordinate value type; `LocationSnapshot`
//! is the "last known truth" bundle held by the tracker and handed to
//! observers. Snapshots are replaced wholesale on update, never mutated
//! field-by-field from outside the tracker.

use crate::geocode::Placemark;
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Bitwise equality on both components
    ///
    /// This is the duplicate-suppression comparison: no epsilon tolerance,
    /// so sub-meter GPS jitter counts as a new coordinate and a re-delivered
    /// identical fix does not.
    pub fn bits_eq(&self, other: &Coordinates) -> bool {
        self.lat.to_bits() == other.lat.to_bits() && self.lng.to_bits() == other.lng.to_bits()
    }
}

/// Last known location truth: coordinate, resolved address, raw placemark
///
/// Exactly one live instance exists per tracker. The address and placemark
/// are never persisted; only the coordinate survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    /// Last accepted coordinate, if any
    pub coordinate: Option<Coordinates>,

    /// Resolved display address, if geocoding succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Raw placemark the address was formatted from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placemark: Option<Placemark>,
}

impl LocationSnapshot {
    /// True when no coordinate is held (cleared or never set)
    pub fn is_empty(&self) -> bool {
        self.coordinate.is_none()
    }

    /// Adopt a resolved placemark: formats the display address and keeps the
    /// raw placemark. An all-empty placemark leaves the address absent.
    pub fn resolve(&mut self, placemark: Placemark) {
        let display = placemark.display_string();
        self.address = (!display.is_empty()).then_some(display);
        self.placemark = Some(placemark);
    }

    /// Drop any resolved address, keeping the coordinate
    pub fn clear_resolution(&mut self) {
        self.address = None;
        self.placemark = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_eq_identical() {
        let a = Coordinates::new(40.7128, -74.0060);
        let b = Coordinates::new(40.7128, -74.0060);
        assert!(a.bits_eq(&b));
    }

    #[test]
    fn test_bits_eq_jitter() {
        let a = Coordinates::new(40.7128, -74.0060);
        let b = Coordinates::new(40.712800000001, -74.0060);
        assert!(!a.bits_eq(&b));
    }

    #[test]
    fn test_bits_eq_signed_zero() {
        // 0.0 and -0.0 compare equal as floats but not bitwise
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(-0.0, 0.0);
        assert!(!a.bits_eq(&b));
    }

    #[test]
    fn test_validate_ok() {
        assert!(Coordinates::new(40.7128, -74.0060).validate().is_ok());
        assert!(Coordinates::new(-90.0, 180.0).validate().is_ok());
    }

    #[test]
    fn test_validate_out_of_range() {
        assert!(Coordinates::new(90.1, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -180.5).validate().is_err());
    }

    #[test]
    fn test_snapshot_default_is_empty() {
        let snapshot = LocationSnapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.address.is_none());
    }

    #[test]
    fn test_snapshot_resolve() {
        let mut snapshot = LocationSnapshot {
            coordinate: Some(Coordinates::new(39.7817, -89.6501)),
            ..Default::default()
        };
        snapshot.resolve(Placemark {
            locality: Some("Springfield".to_string()),
            administrative_area: Some("IL".to_string()),
            postal_code: None,
        });

        assert_eq!(snapshot.address, Some("Springfield, IL".to_string()));
        assert!(snapshot.placemark.is_some());
    }

    #[test]
    fn test_snapshot_resolve_empty_placemark() {
        let mut snapshot = LocationSnapshot::default();
        snapshot.resolve(Placemark::default());

        assert!(snapshot.address.is_none());
        assert!(snapshot.placemark.is_some());
    }

    #[test]
    fn test_snapshot_clear_resolution() {
        let mut snapshot = LocationSnapshot {
            coordinate: Some(Coordinates::new(1.0, 2.0)),
            address: Some("Somewhere".to_string()),
            placemark: Some(Placemark::default()),
        };
        snapshot.clear_resolution();

        assert!(snapshot.address.is_none());
        assert!(snapshot.placemark.is_none());
        assert!(!snapshot.is_empty());
    }
}
