use serde::Serialize;
use std::time::Duration;
use time::OffsetDateTime;

use crate::{as_millis_f64, Latencies, ResultDetail, TIMELINE_WINDOW};

/// Throughput and latency summary of one non-empty timeline window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    pub count: usize,
    pub qps_ok: f64,
    pub qps_error: f64,
    /// Milliseconds.
    pub p50: f64,
    /// Milliseconds.
    pub p99: f64,
}

/// Split `details` into windows using the default [`TIMELINE_WINDOW`].
pub fn build_timeline(details: &[ResultDetail]) -> Vec<TimelineEntry> {
    build_timeline_with(details, TIMELINE_WINDOW)
}

/// Split `details`, in arrival order, into windows of `width`.
///
/// A result joins the open window while its timestamp is before `start + width`; stragglers with
/// an earlier timestamp than the window start stay in the open window. The first result past the
/// window closes it and opens the next one at its own timestamp. Empty windows never appear.
pub fn build_timeline_with(details: &[ResultDetail], width: Duration) -> Vec<TimelineEntry> {
    let mut entries = vec![];
    let Some(first) = details.first() else {
        return entries;
    };

    let mut begin = 0;
    let mut start = first.timestamp;
    for (idx, detail) in details.iter().enumerate().skip(1) {
        if detail.timestamp >= start + width {
            entries.push(summarize(start, &details[begin..idx], width));
            begin = idx;
            start = detail.timestamp;
        }
    }
    entries.push(summarize(start, &details[begin..], width));

    entries
}

fn summarize(start: OffsetDateTime, window: &[ResultDetail], width: Duration) -> TimelineEntry {
    let ok = window.iter().filter(|d| d.is_ok()).count();
    let error = window.len() - ok;
    let latencies: Latencies = window.iter().map(|d| d.latency).collect();
    let secs = width.as_secs_f64();

    TimelineEntry {
        start,
        count: window.len(),
        qps_ok: ok as f64 / secs,
        qps_error: error as f64 / secs,
        p50: latencies.percentile(50.).map(as_millis_f64).unwrap_or_default(),
        p99: latencies.percentile(99.).map(as_millis_f64).unwrap_or_default(),
    }
}
