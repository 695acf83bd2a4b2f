use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Nothing to ingest. Callers may keep going with an empty engine.
    #[error("No documents to index under {0}")]
    EmptyCorpus(String),

    #[error("Document already ingested: {0}")]
    DuplicateDocument(String),

    /// Retrieval was attempted before the lexical index was built.
    #[error("Lexical index has not been built; call build_index() before querying")]
    IndexNotBuilt,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
