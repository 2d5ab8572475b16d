//! Error types for cartopub
//!
//! Uses `thiserror` for library errors. Per-record errors are recovered by
//! the pass that produced them; only setup errors abort a pass.

use thiserror::Error;

use crate::domain::ports::StoreError;

/// Result type alias for cartopub operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Main error type for cartopub operations
#[derive(Error, Debug)]
pub enum PublishError {
    /// A referenced path does not resolve to an existing document
    #[error("missing resource: {path}")]
    MissingResource { path: String },

    /// JSON or YAML parse failure on a source resource
    #[error("malformed payload in {path}: {message}")]
    MalformedPayload { path: String, message: String },

    /// Optional companion provider is absent or its call failed
    #[error("integration unavailable: {message}")]
    IntegrationUnavailable { message: String },

    /// The document store refused a write
    #[error("failed to write {path}: {source}")]
    WriteFailure {
        path: String,
        #[source]
        source: StoreError,
    },

    /// The artifact folder could not be prepared; aborts the pass
    #[error("cannot prepare artifact folder {path}: {source}")]
    ArtifactFolder {
        path: String,
        #[source]
        source: StoreError,
    },

    /// Two different source keys hash to the same artifact path
    #[error("artifact id collision at {path}: '{first}' and '{second}'")]
    IdCollision {
        path: String,
        first: String,
        second: String,
    },

    /// Any other document store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Another pass holds the vault lock
    #[error("another pass is running on this vault (lock: {path})")]
    Locked { path: String },

    /// Invalid configuration file
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    pub fn malformed(path: impl Into<String>, message: impl ToString) -> Self {
        PublishError::MalformedPayload {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        PublishError::MissingResource { path: path.into() }
    }
}
