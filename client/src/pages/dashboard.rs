//! Dashboard shell and home screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shell renders the sidebar, the header with the notification bell and
//! the logout button, and the nested dashboard route in its outlet. Access
//! is decided by the route gate before the shell mounts.

use leptos::prelude::*;
use leptos_router::components::Outlet;
use leptos_router::hooks::use_navigate;
use serde_json::Value;
use storefront::listing::{FetchScope, format_date};
use storefront::workflow::storefront::{DashboardSummary, dashboard_summary, total_stock};

use crate::components::loading::Loading;
use crate::components::notification_bell::NotificationBell;
use crate::components::sidebar::Sidebar;
use crate::state::session::{SessionContext, display_name};
use crate::util::task::spawn;

#[component]
pub fn DashboardLayout() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let session = ctx.session;
    let navigate = use_navigate();
    let busy = RwSignal::new(false);

    let store = ctx.store();
    let mirror = ctx.clone();
    let on_logout = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let store = store.clone();
        let mirror = mirror.clone();
        let navigate = navigate.clone();
        spawn(async move {
            let redirect = store.logout().await;
            mirror.follow(&navigate, redirect);
        });
    };

    view! {
        <div class="dashboard">
            <Sidebar/>
            <div class="dashboard__main">
                <header class="dashboard__header">
                    <a class="dashboard__site-link" href="/">"Storefront"</a>
                    <span class="dashboard__spacer"></span>
                    <NotificationBell/>
                    <span class="dashboard__user">{move || session.with(display_name).unwrap_or_default()}</span>
                    <button class="btn dashboard__logout" on:click=on_logout disabled=move || busy.get()>
                        "Logout"
                    </button>
                </header>
                <main class="dashboard__content">
                    <Outlet/>
                </main>
            </div>
        </div>
    }
}

#[component]
pub fn DashboardHome() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let summary = RwSignal::new(None::<DashboardSummary>);
    let error = RwSignal::new(None::<String>);

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });

    let api = ctx.api();
    let ticket = scope.begin();
    spawn(async move {
        let outcome = dashboard_summary(&api).await;
        scope.commit(ticket, outcome, |outcome| match outcome {
            Ok(loaded) => summary.set(Some(loaded)),
            Err(e) => {
                tracing::warn!(error = %e, "dashboard summary fetch failed");
                error.set(Some(e.to_string()));
            }
        });
    });

    move || {
        if let Some(message) = error.get() {
            return view! { <p class="page-error">{message}</p> }.into_any();
        }
        let Some(stats) = summary.get() else {
            return view! { <Loading/> }.into_any();
        };
        view! {
            <div class="dashboard-home">
                <div class="stat-grid">
                    <StatCard label="Users" value=stats.users.to_string()/>
                    <StatCard label="Products" value=stats.products.to_string()/>
                    <StatCard label="Orders" value=stats.orders.to_string()/>
                    <StatCard label="Purchases" value=stats.purchases.to_string()/>
                    <StatCard label="Recent sales" value=format!("{:.2} EGP", stats.recent_orders_total)/>
                    <StatCard label="Low stock" value=stats.low_stock_count.to_string()/>
                </div>
                <section class="dashboard-home__panel">
                    <h2>"Recent orders"</h2>
                    <ul>{stats.recent_orders.iter().map(recent_order_row).collect_view()}</ul>
                </section>
                <section class="dashboard-home__panel">
                    <h2>"Low stock"</h2>
                    <ul>{stats.low_stock.iter().map(low_stock_row).collect_view()}</ul>
                </section>
            </div>
        }
        .into_any()
    }
}

#[component]
fn StatCard(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="stat-card">
            <span class="stat-card__label">{label}</span>
            <span class="stat-card__value">{value}</span>
        </div>
    }
}

fn recent_order_row(order: &Value) -> impl IntoView + use<> {
    let customer = order["customer"]["name"].as_str().unwrap_or("Guest").to_owned();
    let date = order["createdAt"].as_str().and_then(format_date).unwrap_or_default();
    let total = order["totalAmount"].as_f64().map(|t| format!("{t:.2} EGP")).unwrap_or_default();
    view! {
        <li class="dashboard-home__row">
            <span>{customer}</span>
            <span>{date}</span>
            <span>{total}</span>
        </li>
    }
}

fn low_stock_row(product: &Value) -> impl IntoView + use<> {
    let title = product["title"].as_str().unwrap_or_default().to_owned();
    let stock = total_stock(product);
    view! {
        <li class="dashboard-home__row">
            <span>{title}</span>
            <span>{stock}</span>
        </li>
    }
}
