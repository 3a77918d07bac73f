//! Text generation through a hosted "deployment" invoke API.
//!
//! One job maps to one `POST {base_url}/v2/deployments/invoke` call carrying the
//! deployment key, the target environment, the job input as template variables, and
//! static metadata. The generated text is read from `choices[0].message.content`.
mod config;
pub use config::{ApiKey, DEFAULT_BASE_URL, DEFAULT_ENVIRONMENT, DeploymentConfig};

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use relay_core::{Provider, ProviderError};
use relay_model::JobInput;
use tracing::{debug, instrument};

use crate::{PROVIDER_DEPLOYMENT, SetupError};

const CONNECT_TIMEOUT_SECS: u64 = 30;
const INVOKE_PATH: &str = "/v2/deployments/invoke";
const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

/// [`Provider`] invoking a single configured deployment.
#[derive(Debug, Clone)]
pub struct DeploymentProvider {
    client: reqwest::Client,
    config: DeploymentConfig,
    endpoint: String,
}

impl DeploymentProvider {
    /// Validate `config` and build the HTTP client.
    pub fn new(config: DeploymentConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        let endpoint = format!("{}{INVOKE_PATH}", config.base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Effective configuration.
    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Full invoke URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Provider for DeploymentProvider {
    fn name(&self) -> &'static str {
        PROVIDER_DEPLOYMENT
    }

    #[instrument(level = "debug", skip_all, fields(deployment = %self.config.deployment_key))]
    async fn generate(&self, input: &JobInput) -> Result<String, ProviderError> {
        let body = wire::InvokeRequest::new(&self.config, input);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.config.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY_BYTES),
            });
        }

        let parsed: wire::InvokeResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        debug!(invocation = parsed.id.as_deref().unwrap_or("-"), "deployment answered");
        parsed.into_text()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}
