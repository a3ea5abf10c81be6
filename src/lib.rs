//! geotrack: location tracking with serialized geocoding
//!
//! A library (plus a small CLI) for keeping a single authoritative answer to
//! "where is the user now":
//!
//! - **Location State Tracker** — gatekeeps updates from a live device
//!   location stream and a manual address override, persists the last
//!   accepted coordinate for cold-start recovery, and fans accepted changes
//!   out to registered observers.
//! - **Geocode Request Serializer** — funnels forward/reverse geocode
//!   requests through a single worker (concurrency = 1, global FIFO) with a
//!   fixed-threshold overflow cooldown, to respect third-party rate limits.
//!
//! The host platform's location service and geocoder are trait seams
//! ([`tracker::stream::DeviceStream`], [`geocode::Geocoder`]); a Nominatim
//! backend is included.
//!
//! ## Quick Start
//!
//! ```no_run
//! use geotrack::geocode::nominatim::NominatimGeocoder;
//! use geotrack::{AuthorizationState, GeocodeSerializer, IdleStream, LocationTracker, Store};
//!
//! # async fn demo() -> geotrack::Result<()> {
//! let serializer = GeocodeSerializer::spawn(NominatimGeocoder::new());
//! let store = Store::load()?;
//! let stream = IdleStream::new(AuthorizationState::NotDetermined);
//!
//! let tracker = LocationTracker::start(store, stream, serializer).await;
//! tracker.observe_snapshots(|snapshot| println!("now at: {:?}", snapshot)).await;
//!
//! let snapshot = tracker.set_override_address(Some("Springfield, IL")).await?;
//! println!("resolved: {:?}", snapshot.address);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod constants;
pub mod coord;
pub mod error;
pub mod geocode;
pub mod store;
pub mod tracker;

// Re-export commonly used types
pub use coord::{Coordinates, LocationSnapshot};
pub use error::{Error, Result};
pub use geocode::serializer::GeocodeSerializer;
pub use geocode::{ForwardResolution, Geocoder, Placemark};
pub use store::Store;
pub use tracker::stream::{AuthorizationState, DeviceStream, IdleStream};
pub use tracker::{LocationTracker, TrackerMode};
