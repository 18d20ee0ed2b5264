//! Credential token persistence.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token is the only state shared across components. Writers are login,
//! logout and bootstrap-failure cleanup; readers are the session bootstrap
//! and the request pipeline, which reads it fresh for every request.
//! The browser implementation lives in the `client` crate (`localStorage`).

use std::sync::{Mutex, PoisonError};

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "e-commerce";

/// Backing store for the persisted credential token.
pub trait CredentialStore: Send + Sync {
    /// Current token, or `None` when logged out.
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Treat blank stored values the same as a missing key.
#[must_use]
pub fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|token| !token.trim().is_empty())
}

/// Process-local store, used natively and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Option<String> {
        let token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        non_blank(token.clone())
    }

    fn save(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;
