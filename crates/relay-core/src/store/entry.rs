use std::time::Duration;

use relay_model::Outcome;
use tokio::time::Instant;

/// Stored outcome of one completed job.
///
/// `created_at` is the completion time, not the submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    outcome: Outcome,
    created_at: Instant,
}

impl Entry {
    pub(crate) fn new(outcome: Outcome, created_at: Instant) -> Self {
        Self {
            outcome,
            created_at,
        }
    }

    /// Stored outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Consume the entry, returning its outcome.
    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }

    /// Completion instant of the job.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Age of the entry at `now`; zero if `now` precedes creation.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// Returns `true` once the age strictly exceeds `lifetime`.
    pub fn is_expired_at(&self, now: Instant, lifetime: Duration) -> bool {
        self.age_at(now) > lifetime
    }
}
