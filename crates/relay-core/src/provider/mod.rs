//! Provider abstraction used by the dispatcher to execute jobs.
//!
//! Concrete providers (HTTP deployment APIs, local models, test doubles) implement
//! this trait and are injected into [`crate::Dispatcher`].
mod error;
pub use error::ProviderError;

use std::sync::Arc;

use async_trait::async_trait;
use relay_model::JobInput;

/// External text-generation backend.
///
/// A provider performs exactly one call per job. Retrying is not its concern:
/// any error it returns becomes the job's failure outcome.
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Provider name used in logs and metrics labels.
    fn name(&self) -> &'static str;

    /// Generate text for the given input.
    async fn generate(&self, input: &JobInput) -> Result<String, ProviderError>;
}

/// Shared handle to a provider.
pub type ProviderHandle = Arc<dyn Provider>;
