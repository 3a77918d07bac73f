use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::LoggerError;

/// Timezone for log timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerTimeZone {
    #[default]
    Utc,
    /// System timezone, detected once at logger initialization.
    Local,
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerTimeZone::Utc => "utc",
            LoggerTimeZone::Local => "local",
        })
    }
}

/// RFC 3339 timestamp formatter with a fixed offset.
///
/// Local offset detection fails on most Unix platforms once other threads exist;
/// in that case the timer falls back to UTC and [`LoggerTimer::is_fallback`] is set.
#[derive(Debug, Clone, Copy)]
pub struct LoggerTimer {
    offset: UtcOffset,
    fallback: bool,
}

impl LoggerTimer {
    /// Resolve the offset for `tz`.
    pub fn for_zone(tz: LoggerTimeZone) -> Self {
        match tz {
            LoggerTimeZone::Utc => Self::with_offset(UtcOffset::UTC),
            LoggerTimeZone::Local => match UtcOffset::current_local_offset() {
                Ok(offset) => Self::with_offset(offset),
                Err(_) => Self {
                    offset: UtcOffset::UTC,
                    fallback: true,
                },
            },
        }
    }

    pub fn with_offset(offset: UtcOffset) -> Self {
        Self {
            offset,
            fallback: false,
        }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// `true` when local detection failed and UTC is used instead.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    fn render(&self, at: OffsetDateTime) -> String {
        at.to_offset(self.offset)
            .format(&Rfc3339)
            .unwrap_or_else(|_| "<invalid-time>".to_string())
    }
}

impl FormatTime for LoggerTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{} ", self.render(OffsetDateTime::now_utc()))
    }
}
