//! Dashboard side navigation.
//!
//! DESIGN
//! ======
//! A link is shown only when the route policy would admit the current
//! session to its target, so each role sees exactly the sections it can
//! open.

#[cfg(test)]
#[path = "sidebar_test.rs"]
mod sidebar_test;

use std::sync::Arc;

use leptos::prelude::*;
use storefront::guard::{GuardState, PolicyTable};
use storefront::session::Session;

use crate::state::session::SessionContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Section {
    pub label: &'static str,
    pub href: &'static str,
}

pub const SECTIONS: &[Section] = &[
    Section { label: "Home", href: "/dashboard" },
    Section { label: "Users", href: "/dashboard/users" },
    Section { label: "Customers", href: "/dashboard/customers" },
    Section { label: "Traders", href: "/dashboard/traders" },
    Section { label: "Orders", href: "/dashboard/orders" },
    Section { label: "Purchases", href: "/dashboard/purchases" },
    Section { label: "Categories", href: "/dashboard/categories" },
    Section { label: "Products", href: "/dashboard/products" },
    Section { label: "Notifications", href: "/dashboard/notifications" },
];

/// Sections whose target the policy admits for `session`.
pub fn visible_sections(policy: &PolicyTable, session: &Session) -> Vec<Section> {
    SECTIONS
        .iter()
        .filter(|section| policy.evaluate(section.href, session) == GuardState::Admit)
        .copied()
        .collect()
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let session = expect_context::<SessionContext>().session;
    let policy = expect_context::<Arc<PolicyTable>>();

    let sections = move || session.with(|s| visible_sections(&policy, s));

    view! {
        <aside class="sidebar">
            <nav class="sidebar__nav">
                <For
                    each=sections
                    key=|section| section.href
                    children=move |section| {
                        view! {
                            <a class="sidebar__link" href=section.href>
                                {section.label}
                            </a>
                        }
                    }
                />
            </nav>
        </aside>
    }
}
