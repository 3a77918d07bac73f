use std::sync::Arc;

use async_trait::async_trait;
use relay_core::{JobService, ServiceStats};
use relay_model::{JobId, JobInput, Outcome};
use relay_prometheus::PrometheusMetrics;

use crate::error::ApiError;
use crate::handler::{ApiHandler, MetricsText};

/// Adapter that bridges `JobService` to `ApiHandler`.
pub struct JobServiceAdapter {
    service: Arc<JobService>,
    metrics: Option<PrometheusMetrics>,
}

impl JobServiceAdapter {
    /// Create a new adapter wrapping the given service.
    pub fn new(service: Arc<JobService>) -> Self {
        Self {
            service,
            metrics: None,
        }
    }

    /// Serve `/metrics` from this backend.
    pub fn with_prometheus(mut self, metrics: PrometheusMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[async_trait]
impl ApiHandler for JobServiceAdapter {
    async fn submit_job(&self, id: JobId, input: JobInput) -> Result<(), ApiError> {
        self.service.submit(id, input);
        Ok(())
    }

    async fn take_result(&self, id: &JobId) -> Result<Option<Outcome>, ApiError> {
        Ok(self.service.take_result(id))
    }

    async fn stats(&self) -> Result<ServiceStats, ApiError> {
        Ok(self.service.stats())
    }

    async fn render_metrics(&self) -> Result<Option<MetricsText>, ApiError> {
        let Some(metrics) = &self.metrics else {
            return Ok(None);
        };
        let (body, content_type) = metrics
            .encode_text()
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(Some(MetricsText { body, content_type }))
    }
}
