//! Error taxonomy for fuzz triage operations.
//!
//! Detection ambiguity (zero or multiple corpus candidates) is not an
//! error and never appears here; it is a defined outcome. Branch
//! publication failures are reported in the run outcome rather than
//! raised, so cleanup always gets a chance to run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("git error: {0}")]
    Git(String),

    #[error("failed to spawn {program}: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http error: {0}")]
    Http(String),

    #[error("repository resolution failed: {0}")]
    RepositoryResolution(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fuzz triage operations.
pub type Result<T> = std::result::Result<T, TriageError>;
