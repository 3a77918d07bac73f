mod error;
pub use error::SetupError;

pub mod deployment;
pub use deployment::{ApiKey, DeploymentConfig, DeploymentProvider};

/// Provider name reported in logs and metrics for deployment-backed jobs.
pub const PROVIDER_DEPLOYMENT: &str = "deployment";
