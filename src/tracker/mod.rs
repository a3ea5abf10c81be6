//! Location state tracker
//!
//! Single authoritative holder of "where is the user now". Updates arrive
//! from two sources — the live device location stream and a manual address
//! override — and every accepted change is persisted and fanned out to
//! registered observers exactly once.
//!
//! All mutation of the snapshot, the persisted store, and the stream happens
//! under one `tokio::sync::Mutex`. The lock is never held across a geocode
//! await: an accepted coordinate is adopted and persisted first, the lock is
//! released while the serializer works, and the resolution is applied (and
//! observers notified) only if the held coordinate is still the one that was
//! geocoded. Reads stay responsive even while a geocode is in flight, and
//! each accepted change produces at most one notification.

pub mod stream;

use crate::constants::geo::{DEFAULT_DESIRED_ACCURACY_METERS, DEFAULT_DISTANCE_FILTER_METERS};
use crate::coord::{Coordinates, LocationSnapshot};
use crate::error::Result;
use crate::geocode::serializer::GeocodeSerializer;
use crate::store::Store;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub use stream::{AuthorizationState, DeviceStream, IdleStream};

/// Snapshot-change observer callback
pub type SnapshotObserver = Box<dyn Fn(&LocationSnapshot) + Send + Sync>;

/// Authorization-change observer callback
pub type AuthorizationObserver = Box<dyn Fn(AuthorizationState) + Send + Sync>;

/// The two mutually exclusive tracking modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerMode {
    /// Trust live device location updates
    FollowingDevice,
    /// Freeze on a manually supplied address/coordinate
    UsingFixedOverride,
}

impl TrackerMode {
    /// Decode the persisted `should_use_custom_location` flag
    pub fn from_flag(use_custom_location: bool) -> Self {
        if use_custom_location {
            Self::UsingFixedOverride
        } else {
            Self::FollowingDevice
        }
    }

    fn uses_override(self) -> bool {
        self == Self::UsingFixedOverride
    }
}

impl std::fmt::Display for TrackerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FollowingDevice => write!(f, "following device"),
            Self::UsingFixedOverride => write!(f, "using fixed override"),
        }
    }
}

struct Inner {
    mode: TrackerMode,
    authorization: AuthorizationState,
    snapshot: LocationSnapshot,
    store: Store,
    stream: Box<dyn DeviceStream>,
    snapshot_observers: Vec<SnapshotObserver>,
    authorization_observers: Vec<AuthorizationObserver>,
}

impl Inner {
    /// Whether the snapshot still holds exactly this coordinate (bitwise)
    fn holds(&self, coordinate: Coordinates) -> bool {
        self.snapshot
            .coordinate
            .is_some_and(|held| held.bits_eq(&coordinate))
    }

    fn notify_snapshot(&self) {
        for observer in &self.snapshot_observers {
            observer(&self.snapshot);
        }
    }

    fn notify_authorization(&self, state: AuthorizationState) {
        for observer in &self.authorization_observers {
            observer(state);
        }
    }
}

/// Location state tracker; cheap to clone, all clones share state
#[derive(Clone)]
pub struct LocationTracker {
    inner: Arc<Mutex<Inner>>,
    serializer: GeocodeSerializer,
}

impl LocationTracker {
    /// Construct the tracker and recover persisted state
    ///
    /// Reads the persisted mode flag; in `FollowingDevice` mode with
    /// authorization already granted the stream is started. Otherwise a
    /// persisted coordinate (if any) becomes the initial snapshot, with its
    /// address resolved eagerly in `UsingFixedOverride` mode and lazily (via
    /// [`refresh`](Self::refresh)) in `FollowingDevice` mode. Construction
    /// never notifies observers.
    pub async fn start(
        store: Store,
        stream: impl DeviceStream + 'static,
        serializer: GeocodeSerializer,
    ) -> Self {
        let mut stream: Box<dyn DeviceStream> = Box::new(stream);
        stream.set_distance_filter(DEFAULT_DISTANCE_FILTER_METERS);
        stream.set_desired_accuracy(DEFAULT_DESIRED_ACCURACY_METERS);
        let mode = TrackerMode::from_flag(store.use_custom_location());
        let authorization = stream.authorization();
        let mut snapshot = LocationSnapshot::default();

        if mode == TrackerMode::FollowingDevice && authorization.is_authorized() {
            stream.start();
        } else if let Some(coordinate) = store.last_coordinates() {
            snapshot.coordinate = Some(coordinate);
            if mode.uses_override() {
                match serializer.reverse(coordinate).await {
                    Ok(placemark) => snapshot.resolve(placemark),
                    Err(e) => {
                        warn!("address resolution for recovered coordinate failed: {}", e)
                    }
                }
            }
        }

        Self {
            inner: Arc::new(Mutex::new(Inner {
                mode,
                authorization,
                snapshot,
                store,
                stream,
                snapshot_observers: Vec::new(),
                authorization_observers: Vec::new(),
            })),
            serializer,
        }
    }

    /// Register a snapshot-change observer
    ///
    /// Observers are invoked in insertion order, with no identity dedup:
    /// registering the same callback twice invokes it twice per event.
    pub async fn observe_snapshots(&self, observer: impl Fn(&LocationSnapshot) + Send + Sync + 'static) {
        self.inner
            .lock()
            .await
            .snapshot_observers
            .push(Box::new(observer));
    }

    /// Register an authorization-change observer
    pub async fn observe_authorization(
        &self,
        observer: impl Fn(AuthorizationState) + Send + Sync + 'static,
    ) {
        self.inner
            .lock()
            .await
            .authorization_observers
            .push(Box::new(observer));
    }

    /// The held snapshot
    pub async fn current_snapshot(&self) -> LocationSnapshot {
        self.inner.lock().await.snapshot.clone()
    }

    /// Current tracking mode
    pub async fn mode(&self) -> TrackerMode {
        self.inner.lock().await.mode
    }

    /// Last observed authorization state
    pub async fn authorization(&self) -> AuthorizationState {
        self.inner.lock().await.authorization
    }

    /// Switch tracking modes, persisting the flag immediately
    ///
    /// `FollowingDevice` starts the stream only if authorization is granted;
    /// without it the request is a silent no-op. `UsingFixedOverride` stops
    /// the stream.
    pub async fn set_mode(&self, mode: TrackerMode) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.mode = mode;
        inner.store.set_use_custom_location(mode.uses_override())?;

        match mode {
            TrackerMode::FollowingDevice if inner.authorization.is_authorized() => {
                inner.stream.start()
            }
            TrackerMode::FollowingDevice => {
                debug!("mode is following device but authorization is absent, stream stays idle")
            }
            TrackerMode::UsingFixedOverride => inner.stream.stop(),
        }
        Ok(())
    }

    /// Accept a raw update from the device location stream (fire-and-forget)
    ///
    /// Ignored in `UsingFixedOverride` mode and when both components are
    /// bit-identical to the held coordinate. On acceptance the coordinate is
    /// stored and persisted, reverse geocoded through the serializer, and
    /// observers are notified exactly once — with an absent address if
    /// geocoding failed. Errors are never surfaced to the caller.
    pub async fn accept_device_update(&self, coordinate: Coordinates) {
        {
            let mut inner = self.inner.lock().await;
            if inner.mode.uses_override() {
                debug!("device update ignored, fixed override is active");
                return;
            }
            if let Some(current) = inner.snapshot.coordinate {
                if current.bits_eq(&coordinate) {
                    debug!("device update ignored, coordinate unchanged");
                    return;
                }
            }

            inner.snapshot.coordinate = Some(coordinate);
            inner.snapshot.clear_resolution();
            if let Err(e) = inner.store.set_last_coordinates(coordinate) {
                warn!("failed to persist coordinate: {}", e);
            }
        }

        // Lock released while the serializer works; reads stay responsive
        let resolved = self.serializer.reverse(coordinate).await;

        let mut inner = self.inner.lock().await;
        if !inner.holds(coordinate) {
            debug!("geocode result superseded by a newer update, dropping");
            return;
        }
        match resolved {
            Ok(placemark) => inner.snapshot.resolve(placemark),
            Err(e) => {
                warn!("reverse geocode failed, keeping coordinate: {}", e);
                inner.snapshot.clear_resolution();
            }
        }
        inner.notify_snapshot();
    }

    /// Set or clear the manual override address
    ///
    /// `None`, empty, or whitespace-only input clears the snapshot and
    /// removes the persisted coordinate. Otherwise the address is forward
    /// geocoded: failures are returned to the caller without notifying
    /// observers; on success the resolved coordinate and corrected address
    /// are adopted, persisted, and observers are notified exactly once.
    pub async fn set_override_address(&self, address: Option<&str>) -> Result<LocationSnapshot> {
        let query = address.map(str::trim).filter(|s| !s.is_empty());

        let Some(query) = query else {
            let mut inner = self.inner.lock().await;
            // Persist first, so a failed write leaves the snapshot intact
            inner.store.clear_last_coordinates()?;
            inner.snapshot = LocationSnapshot::default();
            inner.notify_snapshot();
            return Ok(inner.snapshot.clone());
        };

        // Forward geocode without holding the lock
        let resolution = self.serializer.forward(query).await?;

        let mut inner = self.inner.lock().await;
        inner.store.set_last_coordinates(resolution.coordinate)?;
        inner.snapshot.coordinate = Some(resolution.coordinate);
        inner.snapshot.address = Some(resolution.corrected_address);
        inner.snapshot.placemark = Some(resolution.placemark);
        inner.notify_snapshot();
        Ok(inner.snapshot.clone())
    }

    /// Re-resolve the address for the held coordinate
    ///
    /// Used to resolve a cold-start recovered coordinate lazily. No-op when
    /// no coordinate is held; otherwise notifies observers once.
    pub async fn refresh(&self) {
        let Some(coordinate) = self.inner.lock().await.snapshot.coordinate else {
            return;
        };

        let resolved = self.serializer.reverse(coordinate).await;

        let mut inner = self.inner.lock().await;
        if !inner.holds(coordinate) {
            debug!("refresh result superseded by a newer update, dropping");
            return;
        }
        match resolved {
            Ok(placemark) => inner.snapshot.resolve(placemark),
            Err(e) => {
                warn!("reverse geocode failed on refresh: {}", e);
                inner.snapshot.clear_resolution();
            }
        }
        inner.notify_snapshot();
    }

    /// Record an authorization change pushed by the host OS
    ///
    /// `Denied` and `NotDetermined` stop the stream; an authorized state
    /// (re)starts it when the mode is `FollowingDevice`. Authorization
    /// observers receive the raw state in all cases.
    pub async fn on_authorization_changed(&self, state: AuthorizationState) {
        let mut inner = self.inner.lock().await;
        inner.authorization = state;

        match state {
            AuthorizationState::Denied | AuthorizationState::NotDetermined => {
                inner.stream.stop()
            }
            _ if state.is_authorized() && inner.mode == TrackerMode::FollowingDevice => {
                inner.stream.start()
            }
            _ => {}
        }
        inner.notify_authorization(state);
    }

    /// Prompt for location authorization
    ///
    /// Returns false without prompting when authorization is already decided.
    pub async fn request_authorization(&self, desired: AuthorizationState) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.authorization != AuthorizationState::NotDetermined {
            return false;
        }
        inner.stream.request_authorization(desired)
    }

    /// Configure the stream's distance filter in meters
    pub async fn set_distance_filter(&self, meters: f64) {
        self.inner.lock().await.stream.set_distance_filter(meters);
    }

    /// Configure the stream's desired accuracy in meters
    pub async fn set_desired_accuracy(&self, meters: f64) {
        self.inner.lock().await.stream.set_desired_accuracy(meters);
    }
}
