//! CLI-specific error types

use rbaclens_core::CompactionError;
use rbaclens_kube::KubeError;
use thiserror::Error;

/// Errors that can occur while building or running a bucket
#[derive(Debug, Error)]
pub enum BucketError {
    /// The bucket talks to the API server but no client was configured
    #[error("bucket {0:?} requires a Kubernetes client")]
    MissingClient(String),

    /// No bucket is registered under this name or alias
    #[error("unknown bucket {0:?}")]
    UnknownBucket(String),

    /// API server call failed
    #[error(transparent)]
    Kube(#[from] KubeError),

    /// Rule normalization failed
    #[error(transparent)]
    Compaction(#[from] CompactionError),
}

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Bucket resolution or execution error
    #[error("{0}")]
    Bucket(#[from] BucketError),

    /// Cluster configuration or client construction error
    #[error("{0}")]
    Kube(#[from] KubeError),

    /// IO error (stdout, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
