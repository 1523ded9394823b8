use serde::Serialize;
use serde_with::{serde_as, DurationNanoSeconds};
use std::time::Duration;

use crate::{HISTOGRAM_BUCKETS, LATENCY_MARKS};

/// A latency population, sorted ascending on construction.
///
/// Every statistic is read off the sorted values, so an empty population yields `None` or an empty
/// collection rather than panicking.
#[derive(Debug, Clone, Default)]
pub struct Latencies {
    sorted: Vec<Duration>,
}

impl Latencies {
    pub fn new(mut latencies: Vec<Duration>) -> Self {
        latencies.sort_unstable();
        Self { sorted: latencies }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn fastest(&self) -> Option<Duration> {
        self.sorted.first().copied()
    }

    pub fn slowest(&self) -> Option<Duration> {
        self.sorted.last().copied()
    }

    /// Nearest-rank percentile for `p` in (0, 100].
    ///
    /// Values of `p` outside that range clamp to the fastest or slowest latency.
    pub fn percentile(&self, p: f64) -> Option<Duration> {
        let n = self.sorted.len();
        if n == 0 {
            return None;
        }

        // Multiply before dividing so marks like 99.9 land on exact ranks.
        let rank = (p * n as f64 / 100.).ceil() as isize - 1;
        let idx = rank.clamp(0, n as isize - 1) as usize;
        Some(self.sorted[idx])
    }

    /// Percentiles at each of the [`LATENCY_MARKS`].
    pub fn distribution(&self) -> Vec<LatencyDistribution> {
        LATENCY_MARKS
            .iter()
            .filter_map(|&percentage| {
                self.percentile(percentage)
                    .map(|latency| LatencyDistribution {
                        percentage,
                        latency,
                    })
            })
            .collect()
    }

    /// Histogram with the default number of buckets.
    pub fn histogram(&self) -> Vec<Bucket> {
        self.histogram_with(HISTOGRAM_BUCKETS)
    }

    /// Equal-width histogram over [fastest, slowest].
    ///
    /// Each bucket counts the half-open interval starting at its mark; the last bucket also
    /// includes the slowest value.
    pub fn histogram_with(&self, buckets: usize) -> Vec<Bucket> {
        let (Some(fastest), Some(slowest)) = (self.fastest(), self.slowest()) else {
            return vec![];
        };
        let n = self.sorted.len() as f64;

        if fastest == slowest || buckets <= 1 {
            return vec![Bucket {
                mark: fastest.as_secs_f64(),
                count: self.sorted.len(),
                frequency: 1.,
            }];
        }

        let lo = fastest.as_nanos();
        let span = slowest.as_nanos() - lo;
        let mut counts = vec![0usize; buckets];
        for latency in &self.sorted {
            // Integer arithmetic keeps bucket edges exact.
            let idx = ((latency.as_nanos() - lo) * buckets as u128 / span) as usize;
            counts[idx.min(buckets - 1)] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let mark_nanos = lo + span * i as u128 / buckets as u128;
                Bucket {
                    mark: mark_nanos as f64 / 1e9,
                    count,
                    frequency: count as f64 / n,
                }
            })
            .collect()
    }
}

impl FromIterator<Duration> for Latencies {
    fn from_iter<I: IntoIterator<Item = Duration>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// One percentile mark of the latency distribution.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencyDistribution {
    pub percentage: f64,
    #[serde_as(as = "DurationNanoSeconds<u64>")]
    pub latency: Duration,
}

/// One histogram bucket. `mark` is the lower edge of the bucket, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    pub mark: f64,
    pub count: usize,
    pub frequency: f64,
}

/// Milliseconds as a float, the unit the timeline reports latencies in.
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1e6
}
