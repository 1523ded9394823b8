use serde::Serialize;
use serde_with::{serde_as, DurationNanoSeconds};
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;

use crate::STATUS_OK;

/// Failure detail attached to a call outcome.
///
/// Failures are data: they travel alongside the outcome and end up as strings in the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("context canceled")]
    Canceled,

    #[error("transport is unavailable: {0}")]
    Unavailable(String),

    #[error("code = {code} desc = {message}")]
    Status { code: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl CallError {
    /// The status label conventionally paired with this error.
    pub fn code(&self) -> &str {
        match self {
            CallError::DeadlineExceeded => "DeadlineExceeded",
            CallError::Canceled => "Canceled",
            CallError::Unavailable(_) => "Unavailable",
            CallError::Status { code, .. } => code,
            CallError::Other(_) => "Unknown",
        }
    }
}

/// The outcome of one completed call, as sent by a caller to the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub status: String,
    pub duration: Duration,
    pub error: Option<CallError>,
    pub timestamp: OffsetDateTime,
}

impl CallOutcome {
    /// A successful call completing now.
    pub fn ok(duration: Duration) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            duration,
            error: None,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// A failed call completing now, labelled with the error's code.
    pub fn failed(duration: Duration, error: CallError) -> Self {
        Self {
            status: error.code().to_string(),
            duration,
            error: Some(error),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn with_timestamp(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Report-facing projection of a [`CallOutcome`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultDetail {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde_as(as = "DurationNanoSeconds<u64>")]
    pub latency: Duration,
    pub error: String,
    pub status: String,
}

impl From<CallOutcome> for ResultDetail {
    fn from(outcome: CallOutcome) -> Self {
        Self {
            timestamp: outcome.timestamp,
            latency: outcome.duration,
            error: outcome
                .error
                .map(|err| err.to_string())
                .unwrap_or_default(),
            status: outcome.status,
        }
    }
}

impl ResultDetail {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
