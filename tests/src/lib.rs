//! Shared helpers for barrage's integration tests.
use barrage::prelude::*;
use rand_distr::{Distribution, LogNormal};
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        let _ = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_env_filter("barrage=debug,barrage_core=debug,barrage_tests=debug")
            .with_test_writer()
            .try_init();
    });
}

/// A fake call which sleeps for a log-normally distributed time and fails every `fail_every`th
/// invocation.
pub async fn simulated_call(seq: u64, fail_every: u64) -> Result<u64, CallError> {
    let latency = {
        let dist = LogNormal::new(0., 0.5).map_err(|e| CallError::Other(e.to_string()))?;
        let v: f64 = dist.sample(&mut rand::thread_rng());
        Duration::from_micros((v * 500.) as u64)
    };
    tokio::time::sleep(latency).await;

    if fail_every != 0 && seq % fail_every == 0 {
        Err(CallError::DeadlineExceeded)
    } else {
        Ok(seq)
    }
}

/// Issue `calls` simulated calls sequentially, reporting each through `tx`.
pub async fn caller(tx: Sender<CallOutcome>, id: u64, calls: u64, fail_every: u64) -> u64 {
    let mut ok = 0;
    for n in 0..calls {
        let seq = id * calls + n + 1;
        if timed_call(&tx, simulated_call(seq, fail_every)).await.is_ok() {
            ok += 1;
        }
    }
    ok
}
