use std::{any::Any, time::Duration};

use relay_model::{JobInput, Outcome};
use tracing::Instrument;

use crate::{
    metrics::JobOutcome,
    provider::{ProviderError, ProviderHandle},
};

/// Call the provider once and turn every possible result into an [`Outcome`].
///
/// The call runs in its own task so a panic inside the provider is caught
/// as a join error instead of tearing down the job.
pub(super) async fn run(
    provider: ProviderHandle,
    input: JobInput,
    timeout: Option<Duration>,
) -> (Outcome, JobOutcome) {
    match call(provider, input, timeout).await {
        Ok(text) => (Outcome::Success(text), JobOutcome::Success),
        Err(err) => {
            let class = match err {
                ProviderError::Timeout(_) => JobOutcome::Timeout,
                ProviderError::Panicked(_) => JobOutcome::Panicked,
                _ => JobOutcome::Failure,
            };
            (Outcome::Failure(err.to_string()), class)
        }
    }
}

async fn call(
    provider: ProviderHandle,
    input: JobInput,
    timeout: Option<Duration>,
) -> Result<String, ProviderError> {
    let mut handle =
        tokio::spawn(async move { provider.generate(&input).await }.in_current_span());

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                return Err(ProviderError::Timeout(limit));
            }
        },
        None => handle.await,
    };

    match joined {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(ProviderError::Panicked(panic_message(e.into_panic()))),
        Err(e) => Err(ProviderError::Internal(e.to_string())),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
