//! Centralized constants for the geotrack crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Device location stream defaults
pub mod geo {
    /// Meters in one statute mile
    pub const METERS_PER_MILE: f64 = 1609.34;

    /// Default distance filter for the device location stream (one mile)
    pub const DEFAULT_DISTANCE_FILTER_METERS: f64 = METERS_PER_MILE;

    /// Default desired accuracy for the device location stream
    pub const DEFAULT_DESIRED_ACCURACY_METERS: f64 = 100.0;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
}

/// Geocode request serializer policy
pub mod queue {
    /// Pending-request depth above which a cooldown pause is inserted
    pub const OVERFLOW_THRESHOLD: usize = 25;

    /// Length of the overflow cooldown pause in milliseconds
    pub const OVERFLOW_COOLDOWN_MS: u64 = 500;
}

/// Persisted state settings
pub mod store {
    /// Directory name under the platform data dir
    pub const APP_DIR_NAME: &str = "geotrack";

    /// Persisted tracker state file name
    pub const STATE_FILE_NAME: &str = "state.toml";
}
