//! Forbidden and not-found pages.

use leptos::prelude::*;
use storefront::api::types::RoleId;
use storefront::guard::{WRITER_ROLE, forbidden_home_link};

/// Rendered in place of a route whose role allow-list excludes the user.
#[component]
pub fn ForbiddenPage(role: Option<RoleId>) -> impl IntoView {
    let href = forbidden_home_link(role);
    let label = if role == Some(WRITER_ROLE) { "Go to writer space" } else { "Return home" };

    view! {
        <section class="error-page error-page--forbidden">
            <h1 class="error-page__code">"403"</h1>
            <h2>"Access denied"</h2>
            <p>
                "You don't have the necessary permissions to view this resource. "
                "If you believe this is an error, please contact your administrator."
            </p>
            <a class="error-page__link" href=href>{label}</a>
        </section>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="error-page error-page--not-found">
            <h1 class="error-page__code">"404"</h1>
            <h2>"Page not found"</h2>
            <a class="error-page__link" href="/">"Return home"</a>
        </section>
    }
}
