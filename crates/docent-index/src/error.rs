//! Error types for loading and querying the index.

use std::path::PathBuf;

use docent_llm::LlmError;

/// Errors raised while loading a persisted index. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("storage directory not found: {0}")]
    MissingStorage(PathBuf),
    #[error("missing index file: {0}")]
    MissingFile(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupted index data in {file}: {reason}")]
    Corrupted { file: String, reason: String },
    #[error("index store contains no indexes")]
    NoIndex,
    #[error("index store contains {0} indexes; set index.index_id to choose one")]
    AmbiguousIndex(usize),
    #[error("index not found in store: {0}")]
    IndexNotFound(String),
    #[error("unsupported index type: {0}")]
    UnsupportedIndex(String),
    #[error(
        "embedding dimension mismatch for node {node_id}: stored {found}, configured {expected}"
    )]
    DimensionMismatch {
        node_id: String,
        expected: usize,
        found: usize,
    },
}

/// Errors raised while retrieving fragments for a query.
#[derive(Debug, thiserror::Error)]
pub enum RetrieveError {
    #[error("query embedding failed: {0}")]
    Embedding(#[from] LlmError),
    #[error("query embedding has {found} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::MissingStorage(PathBuf::from("storage"));
        assert_eq!(err.to_string(), "storage directory not found: storage");

        let err = LoadError::Corrupted {
            file: "docstore.json".to_string(),
            reason: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "corrupted index data in docstore.json: expected value"
        );

        let err = LoadError::AmbiguousIndex(2);
        assert!(err.to_string().contains("index.index_id"));

        let err = LoadError::DimensionMismatch {
            node_id: "n1".to_string(),
            expected: 1536,
            found: 3072,
        };
        assert_eq!(
            err.to_string(),
            "embedding dimension mismatch for node n1: stored 3072, configured 1536"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;
        let err = LoadError::Io {
            path: PathBuf::from("storage/docstore.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("storage/docstore.json"));
    }

    #[test]
    fn test_retrieve_error_from_llm() {
        let err: RetrieveError = LlmError::Timeout(60).into();
        assert!(matches!(err, RetrieveError::Embedding(_)));
        assert_eq!(
            err.to_string(),
            "query embedding failed: request timed out after 60 seconds"
        );
    }
}
