//! Helpers shared by the demo programs.
use barrage::prelude::*;
use rand_distr::{Distribution, Normal};
use std::time::Duration;

/// Pretends to be a remote call: ~8ms of latency with a small chance of timing out.
pub async fn flaky_echo() -> Result<(), CallError> {
    let latency = {
        let normal = Normal::<f64>::new(8., 2.).map_err(|e| CallError::Other(e.to_string()))?;
        let ms = normal.sample(&mut rand::thread_rng()).max(0.5);
        Duration::from_secs_f64(ms / 1000.)
    };

    if latency > Duration::from_millis(12) {
        tokio::time::sleep(Duration::from_millis(12)).await;
        Err(CallError::DeadlineExceeded)
    } else {
        tokio::time::sleep(latency).await;
        Ok(())
    }
}
