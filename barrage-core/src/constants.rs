use std::time::Duration;

/// Status label which counts a call towards the timeline's Ok class.
pub const STATUS_OK: &str = "OK";

/// Percentile marks reported in the latency distribution.
pub const LATENCY_MARKS: [f64; 8] = [10., 25., 50., 75., 90., 95., 99., 99.9];

/// Number of equal-width buckets in the latency histogram.
pub const HISTOGRAM_BUCKETS: usize = 10;

/// Width of a single timeline window. Per-window QPS is normalized by this width.
pub const TIMELINE_WINDOW: Duration = Duration::from_secs(5);

/// Capacity used by `outcome_channel` when the caller has no preference. A capacity of one keeps
/// callers closely coupled to the reporter, much like an unbuffered channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

pub const DEFAULT_CONCURRENCY: usize = 50;
