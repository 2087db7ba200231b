//! Lifecycle error types

use thiserror::Error;

/// Lifecycle errors
///
/// Impossible transition requests are not errors; they are ignored.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("lifecycle run {run} did not complete: {source}")]
    RunFailed {
        run: u64,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("no Tokio runtime is running; lifecycle runs need one")]
    NoRuntime,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
