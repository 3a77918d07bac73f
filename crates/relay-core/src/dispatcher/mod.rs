//! Fire-and-forget job execution.
//!
//! [`Dispatcher::submit`] spawns one task per job and returns immediately.
//! The task calls the provider once and stores exactly one terminal [`Outcome`]
//! in the [`EntryStore`]; nothing else observes the task afterwards.
mod execute;

use std::{sync::Arc, time::Duration};

use relay_model::{JobId, JobInput, Outcome};
use tokio::time::Instant;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info_span, instrument, warn};

use crate::{
    metrics::{MetricsHandle, noop_metrics},
    provider::ProviderHandle,
    store::EntryStore,
};

/// Schedules jobs against a provider and records their outcomes.
pub struct Dispatcher {
    store: Arc<EntryStore>,
    provider: ProviderHandle,
    metrics: MetricsHandle,
    timeout: Option<Duration>,
    tracker: TaskTracker,
}

impl Dispatcher {
    /// Create a dispatcher writing into `store` and calling `provider`.
    ///
    /// No execution timeout and no-op metrics by default.
    pub fn new(store: Arc<EntryStore>, provider: ProviderHandle) -> Self {
        Self {
            store,
            provider,
            metrics: noop_metrics(),
            timeout: None,
            tracker: TaskTracker::new(),
        }
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Bound each provider call; `None` disables the bound.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Metrics backend shared with the dispatcher.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Number of jobs currently executing.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Schedule execution of `input` under `id` and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(level = "debug", skip(self, id, input), fields(job = %id, provider = self.provider.name()))]
    pub fn submit(&self, id: JobId, input: JobInput) {
        self.metrics.record_job_submitted(self.provider.name());

        let store = Arc::clone(&self.store);
        let provider = Arc::clone(&self.provider);
        let metrics = Arc::clone(&self.metrics);
        let timeout = self.timeout;
        let span = info_span!("job", job = %id, provider = provider.name());

        self.tracker.spawn(
            async move {
                let started = Instant::now();
                let (outcome, class) = execute::run(provider.clone(), input, timeout).await;
                let elapsed_ms = started.elapsed().as_millis() as u64;

                match &outcome {
                    Outcome::Success(_) => debug!(elapsed_ms, "job succeeded"),
                    Outcome::Failure(reason) => warn!(elapsed_ms, %reason, "job failed"),
                }
                store.put(id, outcome);
                metrics.record_job_completed(provider.name(), class, elapsed_ms);
            }
            .instrument(span),
        );
        debug!("job dispatched");
    }

    /// Wait until every job dispatched so far has stored its outcome.
    ///
    /// Jobs submitted while waiting are waited for as well.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Wait for in-flight jobs for at most `grace`.
    ///
    /// Returns `true` if everything finished in time. Jobs still running are left alone.
    pub async fn drain(&self, grace: Duration) -> bool {
        let drained = tokio::time::timeout(grace, self.wait_idle()).await.is_ok();
        if !drained {
            self.tracker.reopen();
        }
        drained
    }
}
