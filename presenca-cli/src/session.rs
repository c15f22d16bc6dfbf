//! Signed-in user and tokens, persisted between invocations.

use presenca_core::{LoginResponse, TokenStore, User};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

/// Token store backed by `session.json` in the data directory.
///
/// Every change is written through immediately. A failed write is logged
/// and the in-memory value kept, so the current invocation still works.
pub struct FileTokenStore {
    path: PathBuf,
    session: Mutex<Session>,
}

impl FileTokenStore {
    /// Opens the session file in `data_dir`. A missing file is an empty session.
    pub fn open(data_dir: &Path) -> Result<Self, SessionError> {
        let path = data_dir.join(SESSION_FILE);
        let session = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| SessionError::ReadError(path.clone(), e))?;
            serde_json::from_str(&contents)
                .map_err(|e| SessionError::ParseError(path.clone(), e))?
        } else {
            Session::default()
        };

        Ok(Self {
            path,
            session: Mutex::new(session),
        })
    }

    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        let session = self.lock();
        session.user.is_some() && session.access_token.is_some()
    }

    /// Records a successful login.
    pub fn sign_in(&self, login: &LoginResponse) {
        let mut session = self.lock();
        session.user = Some(login.user.clone());
        session.access_token = Some(login.access_token.clone());
        session.refresh_token = Some(login.refresh_token.clone());
        self.write(&session);
    }

    /// Forgets the user and both tokens.
    pub fn sign_out(&self) {
        let mut session = self.lock();
        *session = Session::default();
        self.write(&session);
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, session: &Session) {
        if let Err(e) = write_session(&self.path, session) {
            warn!(path = %self.path.display(), error = %e, "failed to save session");
        }
    }
}

fn write_session(path: &Path, session: &Session) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(path, json)
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    fn store(&self, access_token: &str, refresh_token: &str) {
        let mut session = self.lock();
        session.access_token = Some(access_token.to_string());
        session.refresh_token = Some(refresh_token.to_string());
        self.write(&session);
    }

    fn set_access_token(&self, access_token: &str) {
        let mut session = self.lock();
        session.access_token = Some(access_token.to_string());
        self.write(&session);
    }

    fn clear(&self) {
        let mut session = self.lock();
        session.access_token = None;
        session.refresh_token = None;
        self.write(&session);
    }
}

#[derive(Debug)]
pub enum SessionError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_json::Error),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::ReadError(path, e) => {
                write!(f, "Failed to read session '{}': {}", path.display(), e)
            }
            SessionError::ParseError(path, e) => {
                write!(f, "Failed to parse session '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for SessionError {}
