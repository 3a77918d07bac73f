use crate::metrics::backend::{JobOutcome, MetricsBackend};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_job_submitted(&self, _: &str) {}

    #[inline(always)]
    fn record_job_completed(&self, _: &str, _: JobOutcome, _: u64) {}

    #[inline(always)]
    fn record_result_read(&self, _: bool) {}

    #[inline(always)]
    fn record_entries_evicted(&self, _: usize) {}
}
