//! Error types for the TF-IDF pipeline.

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A corpus line is not of the form `<docId>,<text>`.
    #[error("malformed input line {line:?}: {reason}")]
    MalformedInput { line: String, reason: String },

    /// Intermediate data violates a pipeline invariant.
    #[error("data consistency error: {0}")]
    DataConsistency(String),

    /// Encoded weight vector is truncated, over-long or otherwise invalid.
    #[error("malformed weight vector: {0}")]
    MalformedVector(String),

    /// Rejected pipeline configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed_input(line: &str, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
