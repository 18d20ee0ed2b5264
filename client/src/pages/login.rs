//! Login page: identifier + password, or Google sign-in.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::session::SessionContext;
use crate::util::task::spawn;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let identifier = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let google_href = ctx.api().config().endpoint("/connect/google");

    let store = ctx.store();
    let mirror = ctx.clone();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        busy.set(true);
        error.set(None);
        let store = store.clone();
        let mirror = mirror.clone();
        let navigate = navigate.clone();
        let (id, pw) = (identifier.get(), password.get());
        spawn(async move {
            match store.login(&id, &pw).await {
                Ok(redirect) => mirror.follow(&navigate, redirect),
                Err(e) => {
                    tracing::warn!(code = e.error_code(), "login failed");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Login"</h1>
                <input
                    class="auth-input"
                    type="text"
                    placeholder="Email or username"
                    prop:value=move || identifier.get()
                    on:input=move |ev| identifier.set(event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <Show when=move || error.get().is_some()>
                    <p class="auth-error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <button class="auth-button" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in..." } else { "Login" }}
                </button>
                <a class="auth-button auth-button--google" href=google_href>
                    "Continue with Google"
                </a>
                <p class="auth-switch">
                    "No account yet? "
                    <a href="/signup">"Sign up"</a>
                </p>
            </form>
        </div>
    }
}
