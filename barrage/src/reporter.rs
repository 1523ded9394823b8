//! Result ingestion and finalization.
//!
//! A [`Reporter`] owns the receiving end of the outcome channel and is the only task touching the
//! detail log. Callers hold clones of the sender; dropping the last one ends the stream. The
//! reporter then hands its log to the paired [`Done`], and the resulting [`Ingested`] token is the
//! only way to build a [`Report`].
use crate::error::ReporterError;
use barrage_core::{CallOutcome, Options, Report, ResultDetail, RunConfig};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

/// Build the shared outcome channel. A capacity of zero is bumped to one.
pub fn outcome_channel(
    capacity: usize,
) -> (mpsc::Sender<CallOutcome>, mpsc::Receiver<CallOutcome>) {
    mpsc::channel(capacity.max(1))
}

pub struct Reporter {
    rx: mpsc::Receiver<CallOutcome>,
    name: String,
    options: Options,
    done: oneshot::Sender<Ingested>,
}

impl Reporter {
    /// Pair a reporter with its completion signal.
    pub fn new(rx: mpsc::Receiver<CallOutcome>, config: &RunConfig) -> (Self, Done) {
        let (done_tx, done_rx) = oneshot::channel();
        let reporter = Self {
            rx,
            name: config.name.clone(),
            options: config.options(),
            done: done_tx,
        };
        (reporter, Done { rx: done_rx })
    }

    /// Drain the outcome stream until every sender is dropped, then signal completion.
    #[instrument(name = "reporter", skip_all, fields(name = %self.name))]
    pub async fn run(mut self) {
        debug!("Ingesting call outcomes");

        let mut details = vec![];
        while let Some(outcome) = self.rx.recv().await {
            details.push(ResultDetail::from(outcome));
        }

        debug!("Outcome stream closed after {} results", details.len());

        let ingested = Ingested {
            name: self.name,
            options: self.options,
            details,
        };
        if self.done.send(ingested).is_err() {
            warn!("Nothing is waiting on the reporter; discarding results.");
        }
    }

    /// Run the ingestion loop on its own task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run().in_current_span())
    }
}

/// One-shot completion signal for a [`Reporter`].
pub struct Done {
    rx: oneshot::Receiver<Ingested>,
}

impl Done {
    /// Wait for the reporter to drain its stream.
    pub async fn wait(self) -> Result<Ingested, ReporterError> {
        Ok(self.rx.await?)
    }

    /// Blocking variant of [`Done::wait`] for callers outside the async runtime.
    ///
    /// NOTE: Panics if called from within an async execution context.
    pub fn blocking_wait(self) -> Result<Ingested, ReporterError> {
        Ok(self.rx.blocking_recv()?)
    }
}

/// Every outcome the reporter received, in arrival order.
///
/// Only obtainable once ingestion has finished, so finalizing early cannot happen.
#[derive(Debug)]
pub struct Ingested {
    name: String,
    options: Options,
    details: Vec<ResultDetail>,
}

impl Ingested {
    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Produce the final report.
    ///
    /// `stop_reason` and `elapsed` come from whoever ended the run; `elapsed` is the wall-clock
    /// time of the whole run and determines `rps`.
    #[instrument(name = "finalize", skip_all, fields(name = %self.name))]
    pub fn finalize(self, stop_reason: &str, elapsed: Duration) -> Report {
        let report = Report::assemble(
            &self.name,
            self.options,
            stop_reason,
            elapsed,
            self.details,
        );
        info!("Run finished ({stop_reason}): {report}");
        report
    }
}
