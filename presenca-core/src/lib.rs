//! Presença Core Library
//!
//! Attendance models, date handling, aggregation and the sync gateway
//! shared by Presença front ends.

pub mod auth;
pub mod collation;
pub mod date;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod models;
pub mod remote;
pub mod roster;
pub mod storage;
pub mod summary;

pub use auth::{MemoryTokenStore, TokenStore};
pub use error::Error;
pub use gateway::{LoadReport, PartialLoadError, SyncGateway, DEFAULT_PAGE_SIZE};
pub use ledger::{Ledger, RecordFilter};
pub use models::{AttendanceRecord, ClassName, EntityId, NewRecord, PresenceField, Student};
pub use remote::{HttpRemote, LoginResponse, MockRemote, Remote, RemoteError, User};
pub use roster::RosterStore;
pub use storage::{SnapshotKind, SnapshotStorage, StorageError};
pub use summary::{summarize, summarize_by_class, ClassSummary, Summary};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
