use thiserror::Error;

/// Errors raised while building a provider (never while running a job).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid provider configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
