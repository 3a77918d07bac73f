//! Prometheus metrics backend for relay jobs.
//!
//! [`PrometheusMetrics`] implements [`relay_core::MetricsBackend`]; inject it into the
//! dispatcher and janitor, then expose [`PrometheusMetrics::encode_text`] on `/metrics`.
//!
//! ## Metrics
//! - `relay_jobs_submitted_total{provider}` - Counter
//! - `relay_jobs_completed_total{provider, outcome}` - Counter
//! - `relay_job_duration_seconds{provider}` - Histogram
//! - `relay_results_read_total{result}` - Counter (`hit` / `miss`)
//! - `relay_entries_evicted_total` - Counter
mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
