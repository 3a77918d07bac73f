//! JSON bodies of the invoke endpoint.
use std::collections::BTreeMap;

use relay_core::ProviderError;
use relay_model::JobInput;
use serde::{Deserialize, Serialize};

use super::DeploymentConfig;

#[derive(Debug, Serialize)]
pub(super) struct InvokeRequest<'a> {
    key: &'a str,
    context: InvokeContext<'a>,
    inputs: InvokeInputs<'a>,
    #[serde(skip_serializing_if = "is_empty")]
    metadata: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct InvokeContext<'a> {
    environments: [&'a str; 1],
}

#[derive(Debug, Serialize)]
struct InvokeInputs<'a> {
    content: &'a str,
    keywords: &'a str,
    history: &'a str,
}

fn is_empty(metadata: &&BTreeMap<String, String>) -> bool {
    metadata.is_empty()
}

impl<'a> InvokeRequest<'a> {
    pub(super) fn new(config: &'a DeploymentConfig, input: &'a JobInput) -> Self {
        Self {
            key: &config.deployment_key,
            context: InvokeContext {
                environments: [&config.environment],
            },
            inputs: InvokeInputs {
                content: &input.content,
                keywords: &input.keywords,
                history: &input.history,
            },
            metadata: &config.metadata,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct InvokeResponse {
    #[serde(default)]
    pub(super) id: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

impl InvokeResponse {
    /// Text of the first choice.
    pub(super) fn into_text(self) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("response has no choices".into()))?
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("first choice has no message content".into())
            })
    }
}
