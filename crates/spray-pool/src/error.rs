//! Error types for the spray engine

/// Run-level errors. Only these stop a spray.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{observed} or more accounts are locked (threshold {threshold}), source IP is probably being blocked")]
    LockoutBreach { observed: u64, threshold: u64 },

    #[error("worker task failed: {0}")]
    Worker(String),

    #[error("aggregator task failed: {0}")]
    Aggregator(String),
}

/// Per-job errors. The worker logs them, counts a skip, and moves on.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Attempt(#[from] provider::ProviderError),

    #[error("classification failed: {0}")]
    Classification(#[from] aad_auth::Error),
}

impl JobError {
    /// Label used in logs and the `spray_skipped_total` metric.
    pub fn reason(&self) -> &'static str {
        match self {
            JobError::Attempt(e) => e.kind(),
            JobError::Classification(_) => "classification",
        }
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
