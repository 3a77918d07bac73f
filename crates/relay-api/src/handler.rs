use async_trait::async_trait;
use relay_core::ServiceStats;
use relay_model::{JobId, JobInput, Outcome};

use crate::error::ApiError;

/// Rendered metrics exposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsText {
    pub body: String,
    pub content_type: String,
}

/// Job API handler.
///
/// This trait abstracts the backend implementation, allowing users to:
/// - Use the provided `JobServiceAdapter`
/// - Implement custom handlers with additional logic (auth, rate limiting, etc.)
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Schedule a job. Must return before the job executes.
    async fn submit_job(&self, id: JobId, input: JobInput) -> Result<(), ApiError>;

    /// Consume the stored result for `id`, if any.
    async fn take_result(&self, id: &JobId) -> Result<Option<Outcome>, ApiError>;

    /// Current store and dispatcher counters.
    async fn stats(&self) -> Result<ServiceStats, ApiError>;

    /// Metrics exposition; `None` when no metrics backend is attached.
    async fn render_metrics(&self) -> Result<Option<MetricsText>, ApiError> {
        Ok(None)
    }
}
