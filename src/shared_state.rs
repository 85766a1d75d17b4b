use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use axum::extract::FromRef;
use chrono::Utc;
use tokio::sync::Notify;

use crate::config::Config;
use crate::error::WeatherError;
use crate::models::solar::{FetchFailure, WeatherSnapshot};

#[derive(Clone, Debug)]
pub struct AppState {
    /// Last successful weather fetch
    pub snapshot: Arc<RwLock<Option<WeatherSnapshot>>>,
    /// Set by a failed fetch, cleared by the next success
    pub last_failure: Arc<RwLock<Option<FetchFailure>>>,
    /// Wakes the refresh loop for an immediate fetch
    pub refresh: Arc<Notify>,
    pub fetches_ok: Arc<AtomicU64>,
    pub fetches_failed: Arc<AtomicU64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(None)),
            last_failure: Arc::new(RwLock::new(None)),
            refresh: Arc::new(Notify::new()),
            fetches_ok: Arc::new(AtomicU64::new(0)),
            fetches_failed: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn set_snapshot(&self, snapshot: WeatherSnapshot) {
        if let Ok(mut slot) = self.snapshot.write() {
            *slot = Some(snapshot);
        }
        if let Ok(mut failure) = self.last_failure.write() {
            *failure = None;
        }
        self.fetches_ok.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failure. The previous snapshot, if any, stays available.
    pub fn set_failure(&self, err: &WeatherError) {
        if let Ok(mut failure) = self.last_failure.write() {
            *failure = Some(FetchFailure {
                kind: err.kind(),
                message: err.user_message(),
                at: Utc::now(),
            });
        }
        self.fetches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> Option<WeatherSnapshot> {
        self.snapshot.read().ok().and_then(|s| s.clone())
    }

    pub fn get_failure(&self) -> Option<FetchFailure> {
        self.last_failure.read().ok().and_then(|f| f.clone())
    }

    /// (successful, failed) fetch counts since startup
    pub fn fetch_counts(&self) -> (u64, u64) {
        (
            self.fetches_ok.load(Ordering::Relaxed),
            self.fetches_failed.load(Ordering::Relaxed),
        )
    }

    /// Ask the refresh loop to fetch now, cancelling its pending wait.
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }
}

/// Router state: runtime state plus the loaded configuration.
#[derive(Clone, Debug)]
pub struct SharedState {
    pub app: AppState,
    pub config: Arc<Config>,
}

impl FromRef<SharedState> for AppState {
    fn from_ref(s: &SharedState) -> Self {
        s.app.clone()
    }
}

impl FromRef<SharedState> for Arc<Config> {
    fn from_ref(s: &SharedState) -> Self {
        s.config.clone()
    }
}
