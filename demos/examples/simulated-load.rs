use barrage::prelude::*;
use demos::flaky_echo;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

const CONCURRENCY: usize = 20;
const RUN_FOR: Duration = Duration::from_secs(12);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter("simulated_load=info,barrage=debug,barrage_core=debug")
        .init();

    let config = RunConfig::new("demo.Echo/Ping", "localhost:50051")?
        .insecure(true)
        .duration(RUN_FOR);
    let (tx, rx) = outcome_channel(DEFAULT_CHANNEL_CAPACITY);
    let (reporter, done) = Reporter::new(rx, &config);
    reporter.spawn();

    info!("Running {CONCURRENCY} callers for {RUN_FOR:?}");
    let start = Instant::now();
    let callers: Vec<_> = (0..CONCURRENCY)
        .map(|_| {
            let tx = tx.clone();
            tokio::spawn(async move {
                while start.elapsed() < RUN_FOR {
                    let _ = timed_call(&tx, flaky_echo()).await;
                }
            })
        })
        .collect();
    drop(tx);

    for caller in callers {
        caller.await?;
    }

    let report = done
        .wait()
        .await?
        .finalize("duration elapsed", start.elapsed());

    for entry in report.timeline() {
        println!(
            "{}: ok={:.1}/s err={:.1}/s p50={:.2}ms p99={:.2}ms",
            entry.start, entry.qps_ok, entry.qps_error, entry.p50, entry.p99
        );
    }
    println!("{}", report.to_json_pretty()?);

    Ok(())
}
