//! Error types for Dropbox operations.

use thiserror::Error;

/// Errors returned by the Dropbox client and the provisioning helpers.
#[derive(Debug, Error)]
pub enum DropboxError {
    /// No entry exists at the requested path. The one recoverable condition:
    /// the provisioner answers it by creating the folder.
    #[error("Path not found: {0}")]
    NotFound(String),

    /// An entry already occupies the path being created.
    #[error("Path conflict: {0}")]
    Conflict(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Dropbox API error (status {status}): {summary}")]
    Api { status: u16, summary: String },

    #[error("Invalid remote path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result type for Dropbox operations.
pub type DropboxResult<T> = Result<T, DropboxError>;

impl From<reelvault_core::InvalidRemotePath> for DropboxError {
    fn from(err: reelvault_core::InvalidRemotePath) -> Self {
        DropboxError::InvalidPath(err.to_string())
    }
}
