use serde::{Serialize, Serializer};
use serde_with::{serde_as, DurationNanoSeconds};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{
    build_timeline, Bucket, Latencies, LatencyDistribution, Options, ResultDetail, TimelineEntry,
};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unable to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Final statistics for one run.
///
/// Built once from the complete detail log and read-only afterwards. Serializes to the JSON shape
/// downstream tooling consumes: durations as integer nanoseconds, and empty collections as `null`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(skip)]
    name: String,
    #[serde(skip)]
    end_reason: String,

    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
    options: Options,

    count: u64,
    #[serde_as(as = "DurationNanoSeconds<u64>")]
    total: Duration,
    #[serde_as(as = "DurationNanoSeconds<u64>")]
    average: Duration,
    #[serde_as(as = "DurationNanoSeconds<u64>")]
    fastest: Duration,
    #[serde_as(as = "DurationNanoSeconds<u64>")]
    slowest: Duration,
    rps: f64,

    #[serde(serialize_with = "null_if_empty")]
    error_distribution: BTreeMap<String, u64>,
    #[serde(serialize_with = "null_if_empty")]
    status_code_distribution: BTreeMap<String, u64>,
    #[serde(serialize_with = "null_if_empty")]
    latency_distribution: Vec<LatencyDistribution>,
    #[serde(serialize_with = "null_if_empty")]
    histogram: Vec<Bucket>,

    #[serde(skip)]
    timeline: Vec<TimelineEntry>,

    #[serde(serialize_with = "null_if_empty")]
    details: Vec<ResultDetail>,
}

impl Report {
    /// Reduce a complete detail log into a report.
    ///
    /// `elapsed` is the wall-clock duration of the whole run and only feeds `rps`. An empty log
    /// produces zeroed aggregates.
    pub fn assemble(
        name: &str,
        options: Options,
        end_reason: &str,
        elapsed: Duration,
        details: Vec<ResultDetail>,
    ) -> Self {
        let count = details.len() as u64;
        let total: Duration = details.iter().map(|d| d.latency).sum();
        let average = if count > 0 {
            Duration::from_nanos((total.as_nanos() / count as u128) as u64)
        } else {
            Duration::ZERO
        };

        let rps = if count > 0 && !elapsed.is_zero() {
            count as f64 / elapsed.as_secs_f64()
        } else {
            0.
        };

        let mut error_distribution = BTreeMap::new();
        let mut status_code_distribution = BTreeMap::new();
        for detail in &details {
            if !detail.error.is_empty() {
                *error_distribution.entry(detail.error.clone()).or_insert(0) += 1;
            }
            *status_code_distribution
                .entry(detail.status.clone())
                .or_insert(0) += 1;
        }

        let latencies: Latencies = details.iter().map(|d| d.latency).collect();
        let timeline = build_timeline(&details);
        debug!(
            "Assembled {count} results into {} timeline windows",
            timeline.len()
        );

        Self {
            name: name.to_string(),
            end_reason: end_reason.to_string(),
            date: OffsetDateTime::now_utc(),
            options,
            count,
            total,
            average,
            fastest: latencies.fastest().unwrap_or_default(),
            slowest: latencies.slowest().unwrap_or_default(),
            rps,
            error_distribution,
            status_code_distribution,
            latency_distribution: latencies.distribution(),
            histogram: latencies.histogram(),
            timeline,
            details,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn end_reason(&self) -> &str {
        &self.end_reason
    }

    pub fn date(&self) -> OffsetDateTime {
        self.date
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn average(&self) -> Duration {
        self.average
    }

    pub fn fastest(&self) -> Duration {
        self.fastest
    }

    pub fn slowest(&self) -> Duration {
        self.slowest
    }

    pub fn rps(&self) -> f64 {
        self.rps
    }

    pub fn error_distribution(&self) -> &BTreeMap<String, u64> {
        &self.error_distribution
    }

    pub fn status_code_distribution(&self) -> &BTreeMap<String, u64> {
        &self.status_code_distribution
    }

    pub fn latency_distribution(&self) -> &[LatencyDistribution] {
        &self.latency_distribution
    }

    pub fn histogram(&self) -> &[Bucket] {
        &self.histogram
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    pub fn details(&self) -> &[ResultDetail] {
        &self.details
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Count={}, RPS={:.2}, Avg={}, Fastest={}, Slowest={}, Errors={}",
            self.count,
            self.rps,
            humantime::format_duration(self.average),
            humantime::format_duration(self.fastest),
            humantime::format_duration(self.slowest),
            self.error_distribution.values().sum::<u64>(),
        )
    }
}

trait Collection {
    fn is_empty(&self) -> bool;
}

impl<T> Collection for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<K, V> Collection for BTreeMap<K, V> {
    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

fn null_if_empty<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Collection + Serialize,
    S: Serializer,
{
    if value.is_empty() {
        serializer.serialize_none()
    } else {
        value.serialize(serializer)
    }
}
