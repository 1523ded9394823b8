use barrage::prelude::*;
use barrage_tests::{caller, init};
use std::time::{Duration, Instant};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn concurrent_callers() {
    init();

    const CALLERS: u64 = 32;
    const CALLS: u64 = 25;

    let config = RunConfig::new("bench.Echo/Ping", "127.0.0.1:50051").unwrap();
    let (tx, rx) = outcome_channel(DEFAULT_CHANNEL_CAPACITY);
    let (reporter, done) = Reporter::new(rx, &config);
    reporter.spawn();

    let start = Instant::now();
    let handles: Vec<_> = (0..CALLERS)
        .map(|id| tokio::spawn(caller(tx.clone(), id, CALLS, 10)))
        .collect();
    drop(tx);

    let mut ok = 0;
    for handle in handles {
        ok += handle.await.unwrap();
    }

    let report = done.wait().await.unwrap().finalize("completed", start.elapsed());

    assert_eq!(report.count(), CALLERS * CALLS);
    assert_eq!(report.details().len() as u64, report.count());
    assert_eq!(report.status_code_distribution().values().sum::<u64>(), report.count());
    assert_eq!(report.status_code_distribution().get(STATUS_OK), Some(&ok));
    assert_eq!(
        report.error_distribution().get("context deadline exceeded"),
        Some(&(CALLERS * CALLS / 10))
    );

    let histogram_total: usize = report.histogram().iter().map(|b| b.count).sum();
    assert_eq!(histogram_total as u64, report.count());

    let timeline_total: usize = report.timeline().iter().map(|e| e.count).sum();
    assert_eq!(timeline_total as u64, report.count());
    assert!(report.timeline().iter().all(|e| e.count > 0));

    assert!(report.fastest() <= report.average());
    assert!(report.average() <= report.slowest());
    assert!(report.rps() > 0.);

    let distribution = report.latency_distribution();
    assert!(distribution.windows(2).all(|w| w[0].latency <= w[1].latency));
}

#[tokio::test]
async fn report_json_contract() -> anyhow::Result<()> {
    init();

    let config = RunConfig::new("bench.Echo/Ping", "127.0.0.1:50051")?
        .insecure(true)
        .cpus(4);
    let (tx, rx) = outcome_channel(8);
    let (reporter, done) = Reporter::new(rx, &config);
    reporter.spawn();

    tx.send(CallOutcome::ok(Duration::from_millis(12))).await?;
    tx.send(CallOutcome::failed(
        Duration::from_millis(40),
        CallError::Status {
            code: "ResourceExhausted".to_string(),
            message: "quota".to_string(),
        },
    ))
    .await?;
    drop(tx);

    let report = done.wait().await?.finalize("completed", Duration::from_secs(2));
    let value: serde_json::Value = serde_json::from_str(&report.to_json()?)?;

    let keys: Vec<_> = value
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default();
    assert_eq!(keys.len(), 13);

    assert_eq!(
        value["options"],
        serde_json::json!({"insecure": true, "binary": false, "CPUs": 4})
    );
    assert_eq!(value["count"], 2);
    assert_eq!(value["total"], 52_000_000);
    assert_eq!(value["average"], 26_000_000);
    assert_eq!(value["fastest"], 12_000_000);
    assert_eq!(value["slowest"], 40_000_000);
    assert_eq!(value["rps"], 1.0);
    assert_eq!(
        value["errorDistribution"],
        serde_json::json!({"code = ResourceExhausted desc = quota": 1})
    );
    assert_eq!(value["details"][1]["status"], "ResourceExhausted");
    assert_eq!(value["latencyDistribution"].as_array().map(Vec::len), Some(8));
    assert_eq!(value["histogram"].as_array().map(Vec::len), Some(10));

    Ok(())
}

#[tokio::test]
async fn empty_run_serializes_nulls() -> anyhow::Result<()> {
    init();

    let config = RunConfig::new("bench.Echo/Ping", "127.0.0.1:50051")?;
    let (tx, rx) = outcome_channel(1);
    let (reporter, done) = Reporter::new(rx, &config);
    reporter.spawn();
    drop(tx);

    let report = done.wait().await?.finalize("cancelled", Duration::from_millis(10));
    let value: serde_json::Value = serde_json::from_str(&report.to_json()?)?;

    assert_eq!(value["count"], 0);
    assert_eq!(value["average"], 0);
    assert_eq!(value["rps"], 0.0);
    for key in [
        "errorDistribution",
        "statusCodeDistribution",
        "latencyDistribution",
        "histogram",
        "details",
    ] {
        assert!(value[key].is_null(), "{key} should be null");
    }

    Ok(())
}
