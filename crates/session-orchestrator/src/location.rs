//! Location acquisition with manual-entry fallback.
//!
//! Every acquisition captures a request epoch. Starting a new attempt or
//! switching to manual entry bumps the epoch, and a completion only commits
//! while its epoch is still current. The check runs inside the watch update,
//! so it is serialized with every other mutation of the state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crisis_core::{Coordinates, EffectiveLocation, LocationState};
use tokio::sync::watch;

use crate::ports::{LocationError, LocationProvider};

/// One bounded device lookup.
pub struct LocationAcquirer {
    provider: Arc<dyn LocationProvider>,
    timeout: Duration,
}

impl LocationAcquirer {
    pub fn new(provider: Arc<dyn LocationProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Query the provider; an expired wait is reported as [`LocationError::Timeout`].
    pub async fn acquire(&self) -> Result<Coordinates, LocationError> {
        match tokio::time::timeout(self.timeout, self.provider.current_position()).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        }
    }
}

pub struct LocationFallbackController {
    acquirer: LocationAcquirer,
    state: watch::Sender<LocationState>,
    epoch: AtomicU64,
}

impl LocationFallbackController {
    pub fn new(acquirer: LocationAcquirer) -> Self {
        let (state, _) = watch::channel(LocationState::default());
        Self {
            acquirer,
            state,
            epoch: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LocationState> {
        self.state.subscribe()
    }

    /// Latest committed state.
    pub fn state(&self) -> LocationState {
        self.state.borrow().clone()
    }

    pub fn effective_location(&self) -> EffectiveLocation {
        self.state.borrow().effective_location()
    }

    /// Start a fresh acquisition from an empty, loading state.
    pub async fn begin_acquisition(&self) {
        let epoch = self.start_attempt(|s| *s = LocationState::acquiring());
        self.resolve(epoch).await;
    }

    /// Try the device again. The current error, fallback flag and typed
    /// address stay visible until the new attempt succeeds.
    pub async fn retry(&self) {
        let epoch = self.start_attempt(|s| s.loading = true);
        self.resolve(epoch).await;
    }

    /// Switch into manual entry. Supersedes any in-flight request and keeps
    /// whatever address was already typed.
    pub fn enable_manual_entry(&self, reason: Option<String>) {
        self.state.send_if_modified(|s| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            let next = LocationState {
                coordinates: None,
                manual_address: Some(s.manual_address.clone().unwrap_or_default()),
                error: reason,
                loading: false,
                is_fallback_mode: true,
            };
            if *s == next {
                return false;
            }
            *s = next;
            true
        });
    }

    pub fn update_manual_address(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|s| {
            if s.manual_address.as_deref() == Some(text.as_str()) {
                return false;
            }
            s.manual_address = Some(text);
            true
        });
    }

    /// Back to the initial state; in-flight results are discarded.
    pub fn reset(&self) {
        self.state.send_modify(|s| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *s = LocationState::default();
        });
    }

    fn start_attempt(&self, prepare: impl FnOnce(&mut LocationState)) -> u64 {
        let mut epoch = 0;
        self.state.send_modify(|s| {
            epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            prepare(s);
        });
        epoch
    }

    async fn resolve(&self, epoch: u64) {
        let outcome = self.acquirer.acquire().await;

        let committed = self.state.send_if_modified(|s| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            match &outcome {
                Ok(coordinates) => {
                    s.coordinates = Some(*coordinates);
                    s.error = None;
                    s.loading = false;
                    s.is_fallback_mode = false;
                }
                Err(e) => {
                    s.coordinates = None;
                    s.manual_address = Some(s.manual_address.take().unwrap_or_default());
                    s.error = Some(e.to_string());
                    s.loading = false;
                    s.is_fallback_mode = true;
                }
            }
            true
        });

        match (&outcome, committed) {
            (Ok(_), true) => log::info!("Location acquired"),
            (Err(e), true) => log::warn!("Location unavailable, switching to manual entry: {}", e),
            (_, false) => log::debug!("Discarding superseded location result (epoch {})", epoch),
        }
    }
}
