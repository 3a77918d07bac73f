use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FAILURE_PREFIX;

/// Terminal result of one job execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum Outcome {
    /// Provider returned generated text.
    Success(String),
    /// Execution failed; carries a human-readable description.
    Failure(String),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Success`].
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Label value used by metrics and logs.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::Failure(_) => "failure",
        }
    }

    /// Text handed back to the caller.
    ///
    /// Failures are prefixed with [`FAILURE_PREFIX`].
    pub fn into_result_text(self) -> String {
        match self {
            Outcome::Success(text) => text,
            Outcome::Failure(reason) => format!("{FAILURE_PREFIX}{reason}"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(text) => f.write_str(text),
            Outcome::Failure(reason) => write!(f, "{FAILURE_PREFIX}{reason}"),
        }
    }
}
