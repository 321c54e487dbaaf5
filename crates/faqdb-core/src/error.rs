use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed corpus: {0}")]
    CorpusFormat(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Collection '{0}' already exists")]
    CollectionExists(String),

    #[error("Collection '{0}' not found")]
    CollectionNotFound(String),

    #[error("Index operation failed: {0}")]
    IndexOperation(String),

    #[error("Vector dimension mismatch: collection expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Locality filter requested but no locality was supplied")]
    FilterMismatch,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Collection was indexed with embedder '{indexed}' but retriever uses '{current}'")]
    EmbedderMismatch { indexed: String, current: String },

    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: &'static str, after: Duration },

    #[error("Encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_failures_are_not_request_errors() {
        let err: Error = serde_json::from_str::<u32>("\"five\"").map_err(Error::from).expect_err("not a number");
        assert!(matches!(err, Error::Encoding(_)), "{err}");
    }
}
