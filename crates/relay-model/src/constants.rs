//! Common model-level constants.

/// Prefix prepended to failure text when an outcome is rendered for a caller.
///
/// A `Failure("timeout")` is reported as `"Error: timeout"`.
pub const FAILURE_PREFIX: &str = "Error: ";
