use std::time::Duration;

use crate::error::CoreError;

/// Default pause between two sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Default maximum age of an unconsumed entry.
pub const DEFAULT_ENTRY_LIFETIME: Duration = Duration::from_secs(3600);

/// Timing of the janitor loop.
///
/// `lifetime` must be strictly greater than `sweep_interval`, so an expired entry
/// is removed within one or a few sweeps after it expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JanitorConfig {
    sweep_interval: Duration,
    lifetime: Duration,
}

impl JanitorConfig {
    /// Build a validated config.
    pub fn new(sweep_interval: Duration, lifetime: Duration) -> Result<Self, CoreError> {
        if sweep_interval.is_zero() {
            return Err(CoreError::Config("sweep interval must be greater than zero".into()));
        }
        if lifetime <= sweep_interval {
            return Err(CoreError::Config(format!(
                "entry lifetime ({lifetime:?}) must be greater than the sweep interval ({sweep_interval:?})"
            )));
        }
        Ok(Self {
            sweep_interval,
            lifetime,
        })
    }

    /// Pause between two sweeps.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Maximum age of an unconsumed entry.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            lifetime: DEFAULT_ENTRY_LIFETIME,
        }
    }
}
