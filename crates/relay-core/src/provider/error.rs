use std::time::Duration;

use thiserror::Error;

/// Failure of a single provider call.
///
/// The `Display` form is what callers eventually see after the `"Error: "` prefix.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("provider responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider call panicked: {0}")]
    Panicked(String),

    #[error("internal error: {0}")]
    Internal(String),
}
