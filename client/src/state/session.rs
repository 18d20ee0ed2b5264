//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The [`SessionStore`] in the core crate is the source of truth and
//! broadcasts every transition on a watch channel. Route gates and
//! user-aware components read the `RwSignal` mirror instead, so Leptos can
//! track it. The mirror task started by [`SessionContext::start`] writes the
//! signal; so does [`SessionContext::follow`], which copies the store's
//! current state in before navigating so the next route's gate never sees
//! the pre-transition session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use storefront::api::ApiClient;
use storefront::api::types::RoleId;
use storefront::guard::Redirect;
use storefront::session::{Session, SessionStore};

/// Session store plus its reactive mirror, provided via context.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<SessionStore>,
    pub session: RwSignal<Session>,
}

impl SessionContext {
    pub fn new(store: Arc<SessionStore>) -> Self {
        let session = RwSignal::new(store.current_session());
        Self { store, session }
    }

    pub fn store(&self) -> Arc<SessionStore> {
        Arc::clone(&self.store)
    }

    pub fn api(&self) -> ApiClient {
        self.store.api().clone()
    }

    /// Bring the mirror up to date with the store right now.
    pub fn sync(&self) {
        let current = self.store.current_session();
        if self.session.with_untracked(|shown| *shown != current) {
            self.session.set(current);
        }
    }

    /// Navigate after a login, sign-up, OAuth or logout transition.
    pub fn follow<F>(&self, navigate: &F, redirect: Redirect)
    where
        F: Fn(&str, NavigateOptions),
    {
        self.sync();
        crate::util::auth::follow(navigate, redirect);
    }

    /// Start mirroring store transitions and resolve the stored token once.
    pub fn start(&self) {
        let store = self.store();
        let session = self.session;
        crate::util::task::spawn(async move {
            let mut updates = store.subscribe();
            loop {
                session.set(updates.borrow_and_update().clone());
                if updates.changed().await.is_err() {
                    break;
                }
            }
        });

        let store = self.store();
        crate::util::task::spawn(async move {
            let outcome = store.bootstrap().await;
            tracing::info!(?outcome, "session bootstrap settled");
        });
    }
}

/// Name shown in the dashboard header, `None` unless authenticated.
pub fn display_name(session: &Session) -> Option<String> {
    session.identity().map(|identity| identity.display_name().to_owned())
}

pub fn role_of(session: &Session) -> Option<RoleId> {
    session.identity().and_then(|identity| identity.role_id())
}
