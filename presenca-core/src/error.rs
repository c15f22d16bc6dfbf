//! Error types for the attendance core.

use thiserror::Error;

use crate::remote::RemoteError;
use crate::storage::StorageError;

/// Errors returned by gateway operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field is missing or malformed. Raised before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A class or student could not be resolved. Raised before any mutation.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad credentials, or the session could not be refreshed.
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("remote call failed: {0}")]
    Transport(#[from] RemoteError),

    #[error("snapshot storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// True when the failure came from the remote and the call may be retried.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
