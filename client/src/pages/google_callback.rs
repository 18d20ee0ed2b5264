//! Landing route for the Google OAuth redirect.
//!
//! The provider's query string is forwarded untouched to the backend
//! callback, which answers with the session token.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::components::loading::Loading;
use crate::state::session::SessionContext;
use crate::util::task::spawn;

#[component]
pub fn GoogleCallbackPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let query = use_location().search.get_untracked();
    let error = RwSignal::new(None::<String>);

    let store = ctx.store();
    let mirror = ctx.clone();
    spawn(async move {
        match store.complete_oauth_callback(&query).await {
            Ok(redirect) => mirror.follow(&navigate, redirect),
            Err(e) => {
                tracing::warn!(code = e.error_code(), "google sign-in failed");
                error.set(Some(e.to_string()));
            }
        }
    });

    view! {
        <Show
            when=move || error.get().is_none()
            fallback=move || {
                view! {
                    <div class="auth-page">
                        <p class="auth-error">{move || error.get().unwrap_or_default()}</p>
                        <a href="/login">"Back to login"</a>
                    </div>
                }
            }
        >
            <Loading label="Signing you in..."/>
        </Show>
    }
}
