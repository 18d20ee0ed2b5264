//! Route gate: renders the current route only once its guards admit.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps the router outlet. The current path is evaluated against the
//! [`PolicyTable`] on every session or location change. `Pending` and
//! redirect states render only the loading placeholder, so guarded content
//! is never mounted for a session that will not be admitted.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use storefront::guard::{Denial, GuardState, PolicyTable};

use crate::components::loading::Loading;
use crate::pages::errors::ForbiddenPage;
use crate::state::session::{SessionContext, role_of};
use crate::util::auth::install_guard_redirect;

#[component]
pub fn RouteGate(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<SessionContext>().session;
    let policy = expect_context::<Arc<PolicyTable>>();
    let location = use_location();

    let state = Memo::new(move |_| location.pathname.with(|path| session.with(|s| policy.evaluate(path, s))));
    install_guard_redirect(state, use_navigate());

    move || match state.get() {
        GuardState::Admit => children().into_any(),
        GuardState::Deny(Denial::Forbidden) => {
            let role = session.with_untracked(role_of);
            view! { <ForbiddenPage role=role/> }.into_any()
        }
        GuardState::Pending | GuardState::Deny(Denial::Redirect(_)) => view! { <Loading/> }.into_any(),
    }
}
