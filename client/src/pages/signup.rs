//! Sign-up page. Field validation runs before any request is sent.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use storefront::session::SignUpForm;

use crate::state::session::SessionContext;
use crate::util::task::spawn;

#[component]
pub fn SignUpPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let form = RwSignal::new(SignUpForm::default());
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
        let submitted = form.get();
        if let Err(e) = submitted.validate() {
            error.set(Some(e.to_string()));
            return;
        }
        busy.set(true);
        error.set(None);
        let store = store.clone();
        let mirror = mirror.clone();
        let navigate = navigate.clone();
        spawn(async move {
            match store.register(&submitted).await {
                Ok(redirect) => mirror.follow(&navigate, redirect),
                Err(e) => {
                    tracing::warn!(code = e.error_code(), "registration failed");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let field = move |label: &'static str, kind: &'static str, get: fn(&SignUpForm) -> &String, set: fn(&mut SignUpForm, String)| {
        view! {
            <input
                class="auth-input"
                type=kind
                placeholder=label
                prop:value=move || form.with(|f| get(f).clone())
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            />
        }
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Create account"</h1>
                {field("Username", "text", |f| &f.handle, |f, v| f.handle = v)}
                {field("First name", "text", |f| &f.first_name, |f, v| f.first_name = v)}
                {field("Last name", "text", |f| &f.last_name, |f, v| f.last_name = v)}
                {field("Email", "email", |f| &f.email, |f, v| f.email = v)}
                {field("Password", "password", |f| &f.password, |f, v| f.password = v)}
                {field("Confirm password", "password", |f| &f.confirm_password, |f, v| f.confirm_password = v)}
                <Show when=move || error.get().is_some()>
                    <p class="auth-error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <button class="auth-button" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Creating account..." } else { "Sign up" }}
                </button>
                <a class="auth-button auth-button--google" href=google_href>
                    "Continue with Google"
                </a>
                <p class="auth-switch">
                    "Already registered? "
                    <a href="/login">"Login"</a>
                </p>
            </form>
        </div>
    }
}
