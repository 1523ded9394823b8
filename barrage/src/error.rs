use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Reporter stopped before signaling completion (task panicked or was never run)")]
    Aborted(#[from] oneshot::error::RecvError),
}
