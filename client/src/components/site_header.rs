//! Storefront header: brand, section links and the account corner.

use leptos::prelude::*;
use storefront::session::SessionStatus;

use crate::state::session::{SessionContext, display_name};

/// Section pages linked from the header, as `(label, page name)`.
const SECTION_LINKS: &[(&str, &str)] = &[
    ("Electrical tools", "electrical-tools"),
    ("Hand tools", "hand-tools"),
    ("Accessories", "accessories"),
];

#[component]
pub fn SiteHeader() -> impl IntoView {
    let session = expect_context::<SessionContext>().session;

    let account = move || match session.with(storefront::session::Session::status) {
        SessionStatus::Resolving => ().into_any(),
        SessionStatus::Authenticated => {
            let name = session.with(display_name).unwrap_or_default();
            view! {
                <span class="site-header__user">{name}</span>
                <a class="site-header__link" href="/dashboard">"Dashboard"</a>
            }
            .into_any()
        }
        SessionStatus::Anonymous => view! {
            <a class="site-header__link" href="/login">"Login"</a>
            <a class="site-header__link site-header__link--primary" href="/signup">"Sign up"</a>
        }
        .into_any(),
    };

    view! {
        <header class="site-header">
            <a class="site-header__brand" href="/">"Storefront"</a>
            <nav class="site-header__nav">
                {SECTION_LINKS
                    .iter()
                    .map(|(label, page)| view! { <a class="site-header__link" href=format!("/pages/{page}")>{*label}</a> })
                    .collect_view()}
                <a class="site-header__link" href="/contact">"Contact"</a>
            </nav>
            <div class="site-header__account">{account}</div>
        </header>
    }
}
