//! The remote collaborator: persistence and authentication behind one trait.
//!
//! [`HttpRemote`] talks to the real API; [`MockRemote`] is an in-process
//! stand-in with the same contract, used by default and by the tests.

mod http;
mod mock;
mod types;

pub use http::HttpRemote;
pub use mock::{MockRemote, MOCK_EMAIL, MOCK_PASSWORD};
pub use types::{
    Envelope, LoginResponse, Page, Pagination, RecordPayload, RemoteClass, RemoteStudent,
    StudentPayload, User,
};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::EntityId;

/// Errors raised by a remote call.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network failure or timeout.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Credentials rejected, or the session could not be refreshed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RemoteError::Unauthorized(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            RemoteError::Status {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            RemoteError::Connection(e.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        RemoteError::Decode(e.to_string())
    }
}

/// Contract of the remote API.
///
/// Implementations attach credentials themselves; callers only see typed
/// payloads and [`RemoteError`].
#[async_trait]
pub trait Remote: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, RemoteError>;

    async fn list_classes(&self) -> Result<Vec<RemoteClass>, RemoteError>;

    async fn list_students(&self, class_id: &EntityId) -> Result<Vec<RemoteStudent>, RemoteError>;

    async fn create_student(
        &self,
        class_id: &EntityId,
        student: &StudentPayload,
    ) -> Result<RemoteStudent, RemoteError>;

    async fn update_student(
        &self,
        class_id: &EntityId,
        student_id: &EntityId,
        student: &StudentPayload,
    ) -> Result<(), RemoteError>;

    async fn delete_student(
        &self,
        class_id: &EntityId,
        student_id: &EntityId,
    ) -> Result<(), RemoteError>;

    /// Fetches one page of attendance records. Pages start at 1.
    async fn list_attendance(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<RecordPayload>, RemoteError>;

    /// Creates a record and returns it with the id the remote assigned.
    async fn create_attendance(&self, record: &RecordPayload)
        -> Result<RecordPayload, RemoteError>;

    async fn update_attendance(
        &self,
        id: &EntityId,
        record: &RecordPayload,
    ) -> Result<(), RemoteError>;

    async fn delete_attendance(&self, id: &EntityId) -> Result<(), RemoteError>;
}
