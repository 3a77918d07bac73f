use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use relay_model::{JobId, JobInput};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /jobs/{id} - Submit job
    /// - GET /jobs/{id} - Consume job result
    /// - GET /healthz - Liveness and counters
    /// - GET /metrics - Prometheus exposition
    pub fn router(self) -> Router {
        Router::new()
            .route("/jobs/{id}", post(submit_job::<H>).get(take_result::<H>))
            .route("/healthz", get(healthz::<H>))
            .route("/metrics", get(metrics::<H>))
            .with_state(self.handler)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct SubmitJobResponse {
    status: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TakeResultResponse {
    result: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    entries: usize,
    in_flight: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /jobs/{id}
async fn submit_job<H>(
    State(handler): State<Arc<H>>,
    Path(id): Path<String>,
    body: Result<Json<JobInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let id = JobId::new(id)?;
    let Json(input) = body.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    debug!(job = %id, "job accepted");
    handler.submit_job(id, input).await?;

    let response = SubmitJobResponse {
        status: "accepted".to_string(),
    };
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// GET /jobs/{id}
async fn take_result<H>(
    State(handler): State<Arc<H>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let id = JobId::new(id)?;
    let outcome = handler
        .take_result(&id)
        .await?
        .ok_or_else(|| ApiError::job_not_found(id.as_str()))?;

    let response = TakeResultResponse {
        result: outcome.into_result_text(),
    };
    Ok(Json(response))
}

/// GET /healthz
async fn healthz<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let stats = handler.stats().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        entries: stats.entries,
        in_flight: stats.in_flight,
    }))
}

/// GET /metrics
async fn metrics<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let text = handler
        .render_metrics()
        .await?
        .ok_or_else(|| ApiError::NotFound("metrics are not enabled".into()))?;
    Ok(([(header::CONTENT_TYPE, text.content_type)], text.body))
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use relay_core::{
        Dispatcher, EntryStore, Janitor, JanitorConfig, JobService, Provider, ProviderError,
    };
    use relay_model::JobInput;
    use relay_prometheus::PrometheusMetrics;
    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use super::HttpApi;
    use crate::adapter::JobServiceAdapter;

    /// Replies "Hi there" to "hello", hangs on "hang", fails on anything else.
    struct Greeter;

    #[async_trait]
    impl Provider for Greeter {
        fn name(&self) -> &'static str {
            "greeter"
        }

        async fn generate(&self, input: &JobInput) -> Result<String, ProviderError> {
            match input.content.as_str() {
                "hello" => {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok("Hi there".to_string())
                }
                "hang" => std::future::pending().await,
                other => Err(ProviderError::Request(format!("cannot answer '{other}'"))),
            }
        }
    }

    struct Harness {
        service: Arc<JobService>,
        router: Router,
    }

    fn harness(timeout: Option<Duration>, metrics: Option<PrometheusMetrics>) -> Harness {
        let store = Arc::new(EntryStore::new());
        let mut dispatcher =
            Dispatcher::new(Arc::clone(&store), Arc::new(Greeter)).with_timeout(timeout);
        if let Some(m) = &metrics {
            dispatcher = dispatcher.with_metrics(Arc::new(m.clone()));
        }
        let service = Arc::new(JobService::new(store, dispatcher));

        let mut adapter = JobServiceAdapter::new(Arc::clone(&service));
        if let Some(m) = metrics {
            adapter = adapter.with_prometheus(m);
        }
        let router = HttpApi::new(Arc::new(adapter)).router();
        Harness { service, router }
    }

    async fn post_json(router: &Router, uri: &str, body: &str) -> Response {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        router.clone().oneshot(request).await.unwrap()
    }

    async fn get(router: &Router, uri: &str) -> Response {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        router.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const HELLO: &str = r#"{"content":"hello","keywords":"greeting","history":"[]"}"#;

    #[tokio::test(start_paused = true)]
    async fn submit_then_read_once() {
        let h = harness(None, None);

        let resp = post_json(&h.router, "/jobs/r1", HELLO).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(json_body(resp).await, json!({ "status": "accepted" }));

        h.service.dispatcher().wait_idle().await;

        let resp = get(&h.router, "/jobs/r1").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, json!({ "result": "Hi there" }));

        let resp = get(&h.router, "/jobs/r1").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(resp).await, json!({ "error": "job 'r1' not found" }));
    }

    #[tokio::test(start_paused = true)]
    async fn read_before_completion_is_not_found() {
        let h = harness(None, None);

        post_json(&h.router, "/jobs/early", HELLO).await;
        let resp = get(&h.router, "/jobs/early").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        h.service.dispatcher().wait_idle().await;
        let resp = get(&h.router, "/jobs/early").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_job_reads_as_error_text() {
        let h = harness(Some(Duration::from_secs(5)), None);

        let body = r#"{"content":"hang","keywords":"","history":""}"#;
        let resp = post_json(&h.router, "/jobs/r2", body).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);

        h.service.dispatcher().wait_idle().await;

        let resp = get(&h.router, "/jobs/r2").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await,
            json!({ "result": "Error: provider call timed out after 5s" })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn provider_failure_reads_as_error_text() {
        let h = harness(None, None);

        let body = r#"{"content":"riddle","keywords":"","history":""}"#;
        post_json(&h.router, "/jobs/f1", body).await;
        h.service.dispatcher().wait_idle().await;

        let value = json_body(get(&h.router, "/jobs/f1").await).await;
        let text = value["result"].as_str().unwrap();
        assert!(text.starts_with("Error: "), "{text}");
        assert!(text.contains("cannot answer 'riddle'"), "{text}");
    }

    #[tokio::test(start_paused = true)]
    async fn uncollected_result_expires() {
        let h = harness(None, None);
        let cfg = JanitorConfig::new(Duration::from_secs(10), Duration::from_secs(60)).unwrap();
        let janitor =
            Janitor::new(Arc::clone(h.service.store()), cfg).spawn(CancellationToken::new());

        post_json(&h.router, "/jobs/r3", HELLO).await;
        h.service.dispatcher().wait_idle().await;

        tokio::time::sleep(Duration::from_secs(80)).await;

        let resp = get(&h.router, "/jobs/r3").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        janitor.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let h = harness(None, None);

        let resp = post_json(&h.router, "/jobs/bad", "{not json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["error"].is_string());
        assert_eq!(h.service.stats().in_flight, 0);
    }

    #[tokio::test]
    async fn missing_field_is_rejected() {
        let h = harness(None, None);

        let resp = post_json(&h.router, "/jobs/bad", r#"{"content":"hello"}"#).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(h.service.stats().in_flight, 0);
    }

    #[tokio::test]
    async fn blank_id_is_rejected() {
        let h = harness(None, None);

        let resp = post_json(&h.router, "/jobs/%20", HELLO).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn legacy_history_field_is_accepted() {
        let h = harness(None, None);

        let body = r#"{"content":"hello","keywords":"","chat_history":"[]"}"#;
        let resp = post_json(&h.router, "/jobs/legacy", body).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        h.service.dispatcher().wait_idle().await;
    }

    #[tokio::test(start_paused = true)]
    async fn healthz_reports_counters() {
        let h = harness(None, None);
        post_json(&h.router, "/jobs/a", HELLO).await;

        let body = json_body(get(&h.router, "/healthz").await).await;
        assert_eq!(body, json!({ "status": "ok", "entries": 0, "in_flight": 1 }));

        h.service.dispatcher().wait_idle().await;
        let body = json_body(get(&h.router, "/healthz").await).await;
        assert_eq!(body, json!({ "status": "ok", "entries": 1, "in_flight": 0 }));
    }

    #[tokio::test(start_paused = true)]
    async fn metrics_endpoint_exposes_prometheus_text() {
        let h = harness(None, Some(PrometheusMetrics::new().unwrap()));

        post_json(&h.router, "/jobs/m1", HELLO).await;
        h.service.dispatcher().wait_idle().await;
        get(&h.router, "/jobs/m1").await;

        let resp = get(&h.router, "/metrics").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("relay_jobs_submitted_total"));
        assert!(text.contains("relay_results_read_total"));
    }

    #[tokio::test]
    async fn metrics_endpoint_without_backend_is_not_found() {
        let h = harness(None, None);
        let resp = get(&h.router, "/metrics").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
