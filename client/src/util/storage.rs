//! `localStorage`-backed credential store.
//!
//! Outside the browser build every call is a no-op and `load` reports no
//! token, which leaves the session anonymous.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use storefront::storage::CredentialStore;

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStore;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Log a failed storage write; returns whether it went through.
#[cfg_attr(not(feature = "csr"), allow(dead_code))]
fn written<E: std::fmt::Debug>(action: &'static str, outcome: Result<(), E>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(action, error = ?e, "credential storage write failed");
            false
        }
    }
}

impl CredentialStore for BrowserStore {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            let raw = local_storage()?.get_item(storefront::storage::TOKEN_KEY).ok().flatten();
            storefront::storage::non_blank(raw)
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }

    fn save(&self, token: &str) {
        #[cfg(feature = "csr")]
        {
            match local_storage() {
                Some(storage) => {
                    written("save", storage.set_item(storefront::storage::TOKEN_KEY, token));
                }
                None => tracing::warn!("local storage unavailable; token not persisted"),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = token;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "csr")]
        {
            match local_storage() {
                Some(storage) => {
                    written("clear", storage.remove_item(storefront::storage::TOKEN_KEY));
                }
                None => tracing::warn!("local storage unavailable; token not cleared"),
            }
        }
    }
}
