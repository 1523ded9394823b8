use barrage_core::{CallError, CallOutcome};
use std::future::Future;
use std::time::Instant;
use tokio::sync::mpsc::Sender;

#[cfg(feature = "metrics")]
static DESCRIBE_METRICS: std::sync::Once = std::sync::Once::new();

/// Time a single call and report its outcome.
///
/// The call's result is handed back unchanged; the reporter only receives a copy of the outcome.
/// Successful calls are labelled `OK`, failures with [`CallError::code`].
pub async fn timed_call<F, T>(tx: &Sender<CallOutcome>, call: F) -> Result<T, CallError>
where
    F: Future<Output = Result<T, CallError>>,
{
    let start = Instant::now();
    let res = call.await;
    let elapsed = start.elapsed();

    let outcome = match &res {
        Ok(_) => CallOutcome::ok(elapsed),
        Err(err) => CallOutcome::failed(elapsed, err.clone()),
    };

    #[cfg(feature = "metrics")]
    {
        DESCRIBE_METRICS.call_once(|| {
            metrics::describe_histogram!(
                "barrage_call_latency",
                metrics::Unit::Nanoseconds,
                "Latency of calls issued through timed_call"
            );
            metrics::describe_counter!("barrage_calls_total", "Completed calls by status");
        });
        metrics::histogram!("barrage_call_latency").record(elapsed.as_nanos() as f64);
        metrics::counter!("barrage_calls_total", "status" => outcome.status.clone()).increment(1);
    }

    if tx.send(outcome).await.is_err() {
        tracing::error!("Reporter has shut down; dropping call outcome.");
    }

    res
}
