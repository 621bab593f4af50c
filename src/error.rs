//! Error types.
//!
//! Failures stay local to one block: file service errors collapse into the
//! "not found" placeholder, renderer errors are caught by the isolation
//! boundary in [`crate::block`]. Nothing here is fatal to the workspace.

use thiserror::Error;

/// Error returned by the backend file service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileServiceError {
    /// The path does not exist.
    #[error("file not found: {0}")]
    NotFound(String),
    /// The backend could not open the path.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Any other filesystem failure on the backend.
    #[error("i/o error on {path}: {message}")]
    Io { path: String, message: String },
    /// The request itself failed (transport, decode, backend panic).
    #[error("rpc failed: {0}")]
    Rpc(String),
}

impl FileServiceError {
    /// True for the error kind that is expected during normal navigation.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Error returned by the backend object service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectServiceError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("rpc failed: {0}")]
    Rpc(String),
}

/// Error raised by a content renderer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The renderer reported a failure.
    #[error("{view} renderer failed: {message}")]
    Renderer { view: String, message: String },
    /// The renderer panicked.
    #[error("renderer panicked: {0}")]
    Panicked(String),
}

/// Error parsing an object reference (`"<otype>:<oid>"`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ORefError {
    #[error("object reference is missing ':' separator: {0:?}")]
    MissingSeparator(String),
    #[error("object reference has an empty type or id: {0:?}")]
    Empty(String),
}

/// Error loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
