use std::{collections::BTreeMap, fmt};

use crate::SetupError;

/// Default deployment API host.
pub const DEFAULT_BASE_URL: &str = "https://my.orquesta.dev";

/// Default deployment environment.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Secret bearer token; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw token, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Settings of a [`super::DeploymentProvider`].
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    /// API host, without the invoke path.
    pub base_url: String,
    /// Bearer token.
    pub api_key: ApiKey,
    /// Environment the deployment is resolved in (e.g. "production").
    pub environment: String,
    /// Key of the deployment to invoke.
    pub deployment_key: String,
    /// Static metadata attached to every invocation.
    pub metadata: BTreeMap<String, String>,
}

impl DeploymentConfig {
    /// Config with default host and environment.
    pub fn new(api_key: ApiKey, deployment_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            deployment_key: deployment_key.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Add one metadata pair; later values for the same key win.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.api_key.is_empty() {
            return Err(SetupError::InvalidConfig("api key cannot be empty".into()));
        }
        if self.deployment_key.trim().is_empty() {
            return Err(SetupError::InvalidConfig(
                "deployment key cannot be empty".into(),
            ));
        }
        if self.environment.trim().is_empty() {
            return Err(SetupError::InvalidConfig("environment cannot be empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SetupError::InvalidConfig(format!(
                "base url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }
}
