use std::sync::Arc;

/// Job execution outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Provider returned text.
    Success,
    /// Provider returned an error or an unusable response.
    Failure,
    /// Execution exceeded the configured timeout.
    Timeout,
    /// Provider call panicked.
    Panicked,
}

impl JobOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            JobOutcome::Success => "success",
            JobOutcome::Failure => "failure",
            JobOutcome::Timeout => "timeout",
            JobOutcome::Panicked => "panicked",
        }
    }
}

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record a job handed to the dispatcher.
    ///
    /// # Arguments
    /// - `provider`: Provider name (see [`crate::Provider::name`])
    fn record_job_submitted(&self, provider: &str);
    /// Record job completion with outcome and duration.
    ///
    /// Called exactly once per submitted job, right after its entry is stored.
    ///
    /// # Arguments
    /// - `provider`: Provider name
    /// - `outcome`: How the job terminated
    /// - `duration_ms`: Execution time in milliseconds
    fn record_job_completed(&self, provider: &str, outcome: JobOutcome, duration_ms: u64);
    /// Record a result lookup; `hit` is `false` when no entry existed.
    fn record_result_read(&self, hit: bool);
    /// Record entries removed by one janitor sweep.
    fn record_entries_evicted(&self, count: usize);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
