//! Background eviction of entries nobody collected.
//!
//! The janitor alternates between waiting for the next tick and sweeping the store.
//! It stops when its [`CancellationToken`] is cancelled; a sweep that already started
//! runs to completion first.
mod config;
pub use config::JanitorConfig;

use std::sync::Arc;

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace};

use crate::{
    error::CoreError,
    metrics::{MetricsHandle, noop_metrics},
    store::EntryStore,
};

/// Periodic sweeper over an [`EntryStore`].
pub struct Janitor {
    store: Arc<EntryStore>,
    config: JanitorConfig,
    metrics: MetricsHandle,
}

impl Janitor {
    /// Create a janitor for `store`.
    pub fn new(store: Arc<EntryStore>, config: JanitorConfig) -> Self {
        Self {
            store,
            config,
            metrics: noop_metrics(),
        }
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Configured timing.
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Run a single sweep at the current instant and return the number of evicted entries.
    pub fn sweep_once(&self) -> usize {
        let evicted = self
            .store
            .sweep_expired(Instant::now(), self.config.lifetime());
        if evicted > 0 {
            debug!(evicted, remaining = self.store.len(), "evicted expired entries");
        } else {
            trace!("sweep found nothing to evict");
        }
        self.metrics.record_entries_evicted(evicted);
        evicted
    }

    /// Run the loop until `token` is cancelled.
    ///
    /// The first sweep happens one interval after start.
    #[instrument(name = "janitor", level = "debug", skip_all, fields(
        interval = ?self.config.sweep_interval(),
        lifetime = ?self.config.lifetime(),
    ))]
    pub async fn run(self, token: CancellationToken) {
        let period = self.config.sweep_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("janitor started");
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    self.sweep_once();
                }
            }
        }
        info!("janitor stopped");
    }

    /// Spawn the loop on the current runtime.
    ///
    /// The loop stops when `token` (or any of its parents) is cancelled, or via [`JanitorHandle::shutdown`].
    pub fn spawn(self, token: CancellationToken) -> JanitorHandle {
        let join = tokio::spawn(self.run(token.clone()));
        JanitorHandle { token, join }
    }
}

/// Handle to a spawned janitor loop.
pub struct JanitorHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl JanitorHandle {
    /// Token controlling the loop.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Returns `true` once the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancel the loop and wait for it to exit.
    pub async fn shutdown(self) -> Result<(), CoreError> {
        self.token.cancel();
        self.join
            .await
            .map_err(|e| CoreError::Janitor(e.to_string()))
    }
}
