use std::{borrow::Borrow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Caller-supplied identifier of a job.
///
/// The identifier correlates a submission with the later result lookup.
/// It is assumed unique per in-flight job; reusing it overwrites the previous result.
/// Leading and trailing whitespace is kept as-is, but an identifier made only of whitespace is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Create a new identifier, rejecting empty values.
    ///
    /// # Examples
    /// ```
    /// use relay_model::JobId;
    ///
    /// let id = JobId::new("r1").unwrap();
    /// assert_eq!(id.as_str(), "r1");
    /// assert!(JobId::new("  ").is_err());
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, ModelError> {
        Self::try_from(s.into())
    }

    /// Returns the identifier as `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobId {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            return Err(ModelError::EmptyJobId);
        }
        Ok(Self(s))
    }
}

impl FromStr for JobId {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
