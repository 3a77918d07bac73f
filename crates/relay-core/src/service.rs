//! High-level facade used by the HTTP boundary.
//! - Hands submissions to the [`Dispatcher`].
//! - Consumes results from the [`EntryStore`].
use std::sync::Arc;

use relay_model::{JobId, JobInput, Outcome};
use tracing::{debug, instrument};

use crate::{dispatcher::Dispatcher, store::EntryStore};

/// Point-in-time counters exposed by health checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStats {
    /// Completed, not yet collected entries.
    pub entries: usize,
    /// Jobs still executing.
    pub in_flight: usize,
}

/// Job submission and result lookup over a shared store.
pub struct JobService {
    store: Arc<EntryStore>,
    dispatcher: Dispatcher,
}

impl JobService {
    /// Create a service; `dispatcher` must write into the same `store`.
    pub fn new(store: Arc<EntryStore>, dispatcher: Dispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Shared store handle.
    pub fn store(&self) -> &Arc<EntryStore> {
        &self.store
    }

    /// Underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Schedule a job; returns before it executes.
    pub fn submit(&self, id: JobId, input: JobInput) {
        self.dispatcher.submit(id, input);
    }

    /// Consume the result for `id`, if one is stored.
    ///
    /// A second call for the same id returns `None`, exactly like an unknown id.
    #[instrument(level = "debug", skip(self), fields(job = %id))]
    pub fn take_result(&self, id: &JobId) -> Option<Outcome> {
        let entry = self.store.take_if_present(id.as_str());
        self.dispatcher.metrics().record_result_read(entry.is_some());
        match entry {
            Some(entry) => {
                debug!(outcome = entry.outcome().as_label(), "result consumed");
                Some(entry.into_outcome())
            }
            None => {
                debug!("no result stored");
                None
            }
        }
    }

    /// Current counters.
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            entries: self.store.len(),
            in_flight: self.dispatcher.in_flight(),
        }
    }
}
