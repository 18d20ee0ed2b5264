//! Shared guard UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route gates and auth pages apply identical redirect behavior: a guard
//! redirect replaces or pushes history exactly as the decision says.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use storefront::guard::{Denial, GuardState, Redirect};

/// The navigation a guard state asks for, if any.
pub fn pending_redirect(state: GuardState) -> Option<Redirect> {
    match state {
        GuardState::Deny(Denial::Redirect(redirect)) => Some(redirect),
        _ => None,
    }
}

pub fn navigate_options(redirect: Redirect) -> NavigateOptions {
    NavigateOptions { replace: redirect.replace, ..NavigateOptions::default() }
}

/// Perform a redirect returned by a session operation.
pub fn follow<F>(navigate: &F, redirect: Redirect)
where
    F: Fn(&str, NavigateOptions),
{
    navigate(redirect.to, navigate_options(redirect));
}

/// Navigate whenever the guard settles on a redirect.
pub fn install_guard_redirect<F>(state: Memo<GuardState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let Some(redirect) = pending_redirect(state.get()) {
            follow(&navigate, redirect);
        }
    });
}
