//! Device location stream seam
//!
//! The host OS location service is consumed through `DeviceStream`: the
//! tracker tells it to start/stop and reads the authorization state; the
//! host pushes updates back through `LocationTracker::accept_device_update`
//! and `LocationTracker::on_authorization_changed`.

/// Host OS location authorization state; read-only to this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationState {
    NotDetermined,
    Denied,
    Restricted,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl AuthorizationState {
    /// True for the two authorized states only; `Restricted` does not count
    pub fn is_authorized(self) -> bool {
        matches!(self, Self::AuthorizedWhenInUse | Self::AuthorizedAlways)
    }
}

impl std::fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotDetermined => write!(f, "not determined"),
            Self::Denied => write!(f, "denied"),
            Self::Restricted => write!(f, "restricted"),
            Self::AuthorizedWhenInUse => write!(f, "authorized when in use"),
            Self::AuthorizedAlways => write!(f, "authorized always"),
        }
    }
}

/// Trait for device location stream backends
pub trait DeviceStream: Send {
    /// Begin delivering location updates (no-op if unauthorized)
    fn start(&mut self);

    /// Stop delivering location updates
    fn stop(&mut self);

    /// Current authorization state as reported by the host OS
    fn authorization(&self) -> AuthorizationState;

    /// Prompt the user for authorization
    ///
    /// Returns whether a prompt was actually issued (false if the host
    /// refuses, e.g. authorization was already decided).
    fn request_authorization(&mut self, desired: AuthorizationState) -> bool;

    /// Minimum movement, in meters, before a new update is delivered
    fn set_distance_filter(&mut self, _meters: f64) {}

    /// Desired accuracy threshold in meters
    fn set_desired_accuracy(&mut self, _meters: f64) {}
}

/// A stream for hosts without live location: never delivers updates and
/// reports a fixed authorization state
#[derive(Debug, Clone)]
pub struct IdleStream {
    authorization: AuthorizationState,
}

impl IdleStream {
    /// Create an idle stream reporting the given authorization state
    pub fn new(authorization: AuthorizationState) -> Self {
        Self { authorization }
    }
}

impl Default for IdleStream {
    fn default() -> Self {
        Self::new(AuthorizationState::NotDetermined)
    }
}

impl DeviceStream for IdleStream {
    fn start(&mut self) {}

    fn stop(&mut self) {}

    fn authorization(&self) -> AuthorizationState {
        self.authorization
    }

    fn request_authorization(&mut self, _desired: AuthorizationState) -> bool {
        false
    }
}
