#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod caller;
mod error;
pub mod reporter;

pub use barrage_core::{
    build_timeline, build_timeline_with, Bucket, CallError, CallOutcome, ConfigError, Latencies,
    LatencyDistribution, Options, Report, ReportError, ResultDetail, RunConfig, TimelineEntry,
};
pub use caller::timed_call;
pub use error::ReporterError;
pub use reporter::{outcome_channel, Done, Ingested, Reporter};

pub mod prelude {
    pub use crate::caller::timed_call;
    pub use crate::error::ReporterError;
    pub use crate::reporter::{outcome_channel, Done, Ingested, Reporter};

    pub use barrage_core::{
        CallError, CallOutcome, OffsetDateTime, Options, Report, ResultDetail, RunConfig,
        TimelineEntry, DEFAULT_CHANNEL_CAPACITY, STATUS_OK,
    };
}
