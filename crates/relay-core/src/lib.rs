mod error;
pub use error::CoreError;

mod metrics;
pub use metrics::{JobOutcome, MetricsBackend, MetricsHandle, NoOpMetrics, noop_metrics};

mod provider;
pub use provider::{Provider, ProviderError, ProviderHandle};

mod store;
pub use store::{Entry, EntryStore};

mod dispatcher;
pub use dispatcher::Dispatcher;

mod janitor;
pub use janitor::{Janitor, JanitorConfig, JanitorHandle};

mod service;
pub use service::{JobService, ServiceStats};
