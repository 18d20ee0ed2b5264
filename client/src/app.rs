//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Outlet, ParentRoute, Route, Router, Routes};
use leptos_router::{ParamSegment, StaticSegment};
use storefront::api::{ApiClient, Resource};
use storefront::config::ApiConfig;
use storefront::guard::PolicyTable;
use storefront::session::SessionStore;
use storefront::workflow::order::DraftKind;

use crate::components::route_gate::RouteGate;
use crate::components::site_header::SiteHeader;
use crate::pages::contact::ContactPage;
use crate::pages::dashboard::{DashboardHome, DashboardLayout};
use crate::pages::entry_form::{EntryCreatePage, EntryEditPage};
use crate::pages::errors::NotFoundPage;
use crate::pages::google_callback::GoogleCallbackPage;
use crate::pages::home::HomePage;
use crate::pages::ledger_detail::LedgerDetailPage;
use crate::pages::login::LoginPage;
use crate::pages::notifications::NotificationsPage;
use crate::pages::order_form::OrderFormPage;
use crate::pages::product::ProductPage;
use crate::pages::product_form::{ProductCreatePage, ProductEditPage};
use crate::pages::resource_list::ResourceListPage;
use crate::pages::section::SectionPage;
use crate::pages::signup::SignUpPage;
use crate::state::session::SessionContext;
use crate::util::storage::BrowserStore;

/// API config baked in at build time, falling back to the hosted CMS.
fn api_config() -> ApiConfig {
    match option_env!("STOREFRONT_API_BASE_URL") {
        Some(raw) => ApiConfig::with_base_url(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring STOREFRONT_API_BASE_URL");
            ApiConfig::default()
        }),
        None => ApiConfig::default(),
    }
}

fn build_api() -> Option<ApiClient> {
    ApiClient::new(api_config(), Arc::new(BrowserStore))
        .inspect_err(|e| tracing::error!(error = %e, "api client unavailable"))
        .ok()
}

/// Public pages share the storefront header.
#[component]
fn StorefrontLayout() -> impl IntoView {
    view! {
        <SiteHeader/>
        <main class="storefront">
            <Outlet/>
        </main>
    }
}

/// Root application component.
///
/// Provides the session and access policy contexts and sets up client-side
/// routing behind the route gate.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let Some(api) = build_api() else {
        return view! { <p class="page-error">"The store is unavailable right now."</p> }.into_any();
    };
    let ctx = SessionContext::new(Arc::new(SessionStore::new(api)));
    ctx.start();
    provide_context(ctx);
    provide_context(Arc::new(PolicyTable::storefront()));

    view! {
        <Title text="Storefront"/>

        <Router>
            <RouteGate>
                <Routes fallback=|| view! { <NotFoundPage/> }>
                    <ParentRoute path=StaticSegment("") view=StorefrontLayout>
                        <Route path=StaticSegment("") view=HomePage/>
                        <Route path=(StaticSegment("products"), ParamSegment("id")) view=ProductPage/>
                        <Route path=(StaticSegment("pages"), ParamSegment("page_name")) view=SectionPage/>
                        <Route path=StaticSegment("contact") view=ContactPage/>
                        <Route path=StaticSegment("login") view=LoginPage/>
                        <Route path=StaticSegment("signup") view=SignUpPage/>
                        <Route
                            path=(StaticSegment("connect"), StaticSegment("google"), StaticSegment("redirect"))
                            view=GoogleCallbackPage
                        />
                    </ParentRoute>
                    <ParentRoute path=StaticSegment("dashboard") view=DashboardLayout>
                        <Route path=StaticSegment("") view=DashboardHome/>
                        <Route path=StaticSegment("notifications") view=NotificationsPage/>

                        <Route path=StaticSegment("users") view=|| view! { <ResourceListPage resource=Resource::Users/> }/>
                        <Route path=(StaticSegment("user"), StaticSegment("add")) view=|| view! { <EntryCreatePage resource=Resource::Users/> }/>
                        <Route path=(StaticSegment("users"), ParamSegment("id")) view=|| view! { <EntryEditPage resource=Resource::Users/> }/>

                        <Route path=StaticSegment("customers") view=|| view! { <ResourceListPage resource=Resource::Customers/> }/>
                        <Route path=(StaticSegment("customer"), StaticSegment("add")) view=|| view! { <EntryCreatePage resource=Resource::Customers/> }/>
                        <Route path=(StaticSegment("customers"), ParamSegment("id")) view=|| view! { <EntryEditPage resource=Resource::Customers/> }/>

                        <Route path=StaticSegment("traders") view=|| view! { <ResourceListPage resource=Resource::Traders/> }/>
                        <Route path=(StaticSegment("trader"), StaticSegment("add")) view=|| view! { <EntryCreatePage resource=Resource::Traders/> }/>
                        <Route path=(StaticSegment("traders"), ParamSegment("id")) view=|| view! { <EntryEditPage resource=Resource::Traders/> }/>

                        <Route path=StaticSegment("categories") view=|| view! { <ResourceListPage resource=Resource::Categories/> }/>
                        <Route path=(StaticSegment("category"), StaticSegment("add")) view=|| view! { <EntryCreatePage resource=Resource::Categories/> }/>
                        <Route path=(StaticSegment("categories"), ParamSegment("id")) view=|| view! { <EntryEditPage resource=Resource::Categories/> }/>

                        <Route path=StaticSegment("orders") view=|| view! { <ResourceListPage resource=Resource::Orders/> }/>
                        <Route path=(StaticSegment("order"), StaticSegment("add")) view=|| view! { <OrderFormPage kind=DraftKind::Sale/> }/>
                        <Route path=(StaticSegment("orders"), ParamSegment("id")) view=|| view! { <LedgerDetailPage kind=DraftKind::Sale/> }/>

                        <Route path=StaticSegment("purchases") view=|| view! { <ResourceListPage resource=Resource::Purchases/> }/>
                        <Route path=(StaticSegment("purchase"), StaticSegment("add")) view=|| view! { <OrderFormPage kind=DraftKind::Purchase/> }/>
                        <Route path=(StaticSegment("purchases"), ParamSegment("id")) view=|| view! { <LedgerDetailPage kind=DraftKind::Purchase/> }/>

                        <Route path=StaticSegment("products") view=|| view! { <ResourceListPage resource=Resource::Products/> }/>
                        <Route path=(StaticSegment("product"), StaticSegment("add")) view=ProductCreatePage/>
                        <Route path=(StaticSegment("products"), ParamSegment("id")) view=ProductEditPage/>
                    </ParentRoute>
                </Routes>
            </RouteGate>
        </Router>
    }
    .into_any()
}
