//! Credential storage used by the HTTP remote.

use std::sync::{Mutex, MutexGuard};

/// Provider of the access and refresh tokens attached to remote calls.
///
/// Implementations must be cheap to call; the HTTP remote reads the access
/// token before every request.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    /// Stores a fresh pair after login.
    fn store(&self, access_token: &str, refresh_token: &str);

    /// Replaces the access token after a refresh.
    fn set_access_token(&self, access_token: &str);

    /// Forgets both tokens.
    fn clear(&self);
}

#[derive(Debug, Default, Clone)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// In-memory token store. Tokens live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Tokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let store = Self::new();
        store.store(access_token, refresh_token);
        store
    }

    fn lock(&self) -> MutexGuard<'_, Tokens> {
        self.tokens.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.lock().access.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.lock().refresh.clone()
    }

    fn store(&self, access_token: &str, refresh_token: &str) {
        let mut tokens = self.lock();
        tokens.access = Some(access_token.to_string());
        tokens.refresh = Some(refresh_token.to_string());
    }

    fn set_access_token(&self, access_token: &str) {
        self.lock().access = Some(access_token.to_string());
    }

    fn clear(&self) {
        *self.lock() = Tokens::default();
    }
}
