// Error types shared by both service clients and the credential store.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed transport fault, kept opaque so callers never see the HTTP
/// library's own error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// A local precondition failed before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("No API key configured. Run 'register' first or set {0}.")]
    MissingApiKey(&'static str),

    /// The remote service answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        details: Option<String>,
    },

    /// DNS failure, refused connection, timeout and friends.
    #[error("Request failed: {0}")]
    Network(#[source] BoxError),

    #[error("Credentials file not found: {}\nRun 'register' to create one.", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed credentials file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Server-provided error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            ClientError::Api { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
