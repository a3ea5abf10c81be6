//! Error types for geotrack

use thiserror::Error;

/// Main error type for geotrack operations
///
/// Authorization absence and empty override input are deliberately not
/// errors: the stream stays idle and the snapshot is cleared, respectively.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for geotrack operations
pub type Result<T> = std::result::Result<T, Error>;
