use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use relay_core::{JobOutcome, MetricsBackend};

const NAMESPACE: &str = "relay";

/// Prometheus metrics backend for relay.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `provider`: one value per configured provider
/// - `outcome`: "success", "failure", "timeout", "panicked"
/// - `result`: "hit", "miss"
#[derive(Clone)]
pub struct PrometheusMetrics {
    jobs_submitted: CounterVec,
    jobs_completed: CounterVec,
    job_duration: HistogramVec,
    results_read: CounterVec,
    entries_evicted: IntCounter,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registering its metrics into `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let jobs_submitted = CounterVec::new(
            Opts::new("jobs_submitted_total", "Total number of jobs submitted").namespace(NAMESPACE),
            &["provider"],
        )?;
        registry.register(Box::new(jobs_submitted.clone()))?;

        let jobs_completed = CounterVec::new(
            Opts::new("jobs_completed_total", "Total number of jobs completed")
                .namespace(NAMESPACE),
            &["provider", "outcome"],
        )?;
        registry.register(Box::new(jobs_completed.clone()))?;

        let job_duration = HistogramVec::new(
            HistogramOpts::new("job_duration_seconds", "Job execution duration in seconds")
                .namespace(NAMESPACE)
                .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
            &["provider"],
        )?;
        registry.register(Box::new(job_duration.clone()))?;

        let results_read = CounterVec::new(
            Opts::new("results_read_total", "Result lookups by hit/miss").namespace(NAMESPACE),
            &["result"],
        )?;
        registry.register(Box::new(results_read.clone()))?;

        let entries_evicted = IntCounter::with_opts(
            Opts::new(
                "entries_evicted_total",
                "Entries removed by the janitor before being read",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(entries_evicted.clone()))?;

        Ok(Self {
            jobs_submitted,
            jobs_completed,
            job_duration,
            results_read,
            entries_evicted,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metric families.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render all metrics in the Prometheus text exposition format.
    ///
    /// Returns the body and its content type.
    pub fn encode_text(&self) -> Result<(String, String), prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        let body = String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("metrics are not utf-8: {e}")))?;
        Ok((body, encoder.format_type().to_string()))
    }

    /// Underlying registry, for registering custom metrics alongside relay metrics.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_job_submitted(&self, provider: &str) {
        self.jobs_submitted.with_label_values(&[provider]).inc();
    }

    fn record_job_completed(&self, provider: &str, outcome: JobOutcome, duration_ms: u64) {
        self.jobs_completed
            .with_label_values(&[provider, outcome.as_label()])
            .inc();
        self.job_duration
            .with_label_values(&[provider])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_result_read(&self, hit: bool) {
        let label = if hit { "hit" } else { "miss" };
        self.results_read.with_label_values(&[label]).inc();
    }

    fn record_entries_evicted(&self, count: usize) {
        self.entries_evicted.inc_by(count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.name() == name)
            .unwrap_or_else(|| panic!("metric {name} not found"))
    }

    #[test]
    fn job_counters_are_labelled_by_provider() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_job_submitted("deployment");
        metrics.record_job_submitted("deployment");
        metrics.record_job_submitted("echo");

        let families = metrics.gather();
        let submitted = family(&families, "relay_jobs_submitted_total");
        assert_eq!(submitted.get_metric().len(), 2);
    }

    #[test]
    fn completion_updates_counter_and_histogram() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_job_completed("deployment", JobOutcome::Success, 1500);
        metrics.record_job_completed("deployment", JobOutcome::Timeout, 120_000);

        let families = metrics.gather();
        assert_eq!(
            family(&families, "relay_jobs_completed_total").get_metric().len(),
            2
        );
        assert_eq!(
            family(&families, "relay_job_duration_seconds").get_metric().len(),
            1
        );
    }

    #[test]
    fn reads_and_evictions_are_counted() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_result_read(true);
        metrics.record_result_read(false);
        metrics.record_result_read(false);
        metrics.record_entries_evicted(4);
        metrics.record_entries_evicted(0);

        assert_eq!(metrics.entries_evicted.get(), 4);
        assert_eq!(metrics.results_read.with_label_values(&["miss"]).get(), 2.0);
        assert_eq!(metrics.results_read.with_label_values(&["hit"]).get(), 1.0);
    }

    #[test]
    fn text_encoding_contains_metric_names() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_job_submitted("deployment");

        let (body, content_type) = metrics.encode_text().unwrap();
        assert!(body.contains("relay_jobs_submitted_total"));
        assert!(content_type.starts_with("text/plain"));
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = Arc::new(Registry::new());
        PrometheusMetrics::new_with_registry(registry.clone()).unwrap();
        assert!(PrometheusMetrics::new_with_registry(registry).is_err());
    }
}
