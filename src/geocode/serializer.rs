//! Geocode request serializer
//!
//! Converts a potentially bursty stream of geocode requests into a strictly
//! sequential execution order: one worker task drains a FIFO channel, so
//! observed concurrency against the backend never exceeds 1. When the
//! pending depth crosses a fixed threshold, a cooldown pause is inserted
//! ahead of the request that found the queue saturated.
//!
//! Known limitation: there is no timeout or cancellation, so a request that
//! never completes stalls the whole queue.

use crate::constants::queue::{OVERFLOW_COOLDOWN_MS, OVERFLOW_THRESHOLD};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geocode::{ForwardResolution, Geocoder, Placemark};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

/// Handle to the serializer worker; cheap to clone
#[derive(Clone)]
pub struct GeocodeSerializer {
    tx: mpsc::UnboundedSender<Job>,
    depth: Arc<AtomicUsize>,
}

/// A pending geocode request; await [`PendingGeocode::wait`] for the result
///
/// State machine per request: queued -> running -> completed (ok or err).
/// Terminal states are final; there is no cancellation.
pub struct PendingGeocode<T> {
    id: Uuid,
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> PendingGeocode<T> {
    /// Diagnostic id of the underlying request
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the request to complete
    pub async fn wait(self) -> Result<T> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(Error::Geocoding("Geocode serializer shut down".to_string())),
        }
    }
}

enum Job {
    Forward {
        id: Uuid,
        query: String,
        reply: oneshot::Sender<Result<ForwardResolution>>,
    },
    Reverse {
        id: Uuid,
        coordinate: Coordinates,
        reply: oneshot::Sender<Result<Placemark>>,
    },
    Cooldown,
}

impl GeocodeSerializer {
    /// Spawn the worker task around a geocoding backend
    pub fn spawn<G>(geocoder: G) -> Self
    where
        G: Geocoder + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));
        tokio::spawn(run_worker(geocoder, rx, Arc::clone(&depth)));
        Self { tx, depth }
    }

    /// Number of geocode requests currently queued or running
    pub fn pending(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Enqueue a forward geocode request
    pub fn submit_forward(&self, query: &str) -> PendingGeocode<ForwardResolution> {
        let id = Uuid::new_v4();
        let (reply, rx) = oneshot::channel();
        self.enqueue(
            id,
            Job::Forward {
                id,
                query: query.to_string(),
                reply,
            },
        );
        PendingGeocode { id, rx }
    }

    /// Enqueue a reverse geocode request
    pub fn submit_reverse(&self, coordinate: Coordinates) -> PendingGeocode<Placemark> {
        let id = Uuid::new_v4();
        let (reply, rx) = oneshot::channel();
        self.enqueue(
            id,
            Job::Reverse {
                id,
                coordinate,
                reply,
            },
        );
        PendingGeocode { id, rx }
    }

    /// Forward geocode and wait for the result
    pub async fn forward(&self, query: &str) -> Result<ForwardResolution> {
        self.submit_forward(query).wait().await
    }

    /// Reverse geocode and wait for the result
    pub async fn reverse(&self, coordinate: Coordinates) -> Result<Placemark> {
        self.submit_reverse(coordinate).wait().await
    }

    fn enqueue(&self, id: Uuid, job: Job) {
        let pending = self.depth.fetch_add(1, Ordering::SeqCst);
        if pending >= OVERFLOW_THRESHOLD {
            debug!(%id, pending, "queue overflow, inserting cooldown");
            // Cooldown runs ahead of the request that found the queue saturated
            let _ = self.tx.send(Job::Cooldown);
        }
        if self.tx.send(job).is_err() {
            // Worker gone; the pending handle resolves to an error on await
            self.depth.fetch_sub(1, Ordering::SeqCst);
            warn!(%id, "geocode request dropped, worker is not running");
        }
    }
}

async fn run_worker<G: Geocoder>(
    geocoder: G,
    mut rx: mpsc::UnboundedReceiver<Job>,
    depth: Arc<AtomicUsize>,
) {
    while let Some(job) = rx.recv().await {
        match job {
            Job::Cooldown => {
                tokio::time::sleep(Duration::from_millis(OVERFLOW_COOLDOWN_MS)).await;
            }
            Job::Forward { id, query, reply } => {
                // Start time is recorded for diagnostics only
                let started = chrono::Utc::now();
                debug!(%id, %started, query = %query, "forward geocode started");
                let result = geocoder.forward(&query).await;
                depth.fetch_sub(1, Ordering::SeqCst);
                if let Err(ref e) = result {
                    debug!(%id, "forward geocode failed: {}", e);
                }
                let _ = reply.send(result);
            }
            Job::Reverse {
                id,
                coordinate,
                reply,
            } => {
                let started = chrono::Utc::now();
                debug!(%id, %started, lat = coordinate.lat, lng = coordinate.lng, "reverse geocode started");
                let result = geocoder.reverse(coordinate).await;
                depth.fetch_sub(1, Ordering::SeqCst);
                if let Err(ref e) = result {
                    debug!(%id, "reverse geocode failed: {}", e);
                }
                let _ = reply.send(result);
            }
        }
    }
}
