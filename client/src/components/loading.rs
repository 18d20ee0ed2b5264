//! Loading placeholder shown while a route or fetch is unresolved.

use leptos::prelude::*;

#[component]
pub fn Loading(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="loading" role="status" aria-live="polite">
            <span class="loading__spinner" aria-hidden="true"></span>
            <span class="loading__label">{label.unwrap_or_else(|| "Loading...".to_owned())}</span>
        </div>
    }
}
