//! Generic dashboard list screen: search, pagination, delete.
//!
//! DESIGN
//! ======
//! One component serves every collection. [`list_spec`] names the columns
//! and routes per collection; [`PageState`] owns the page/limit/search reset
//! rules. The search box writes a draft that is debounced into the page
//! state, and every fetch goes through a [`FetchScope`] ticket so a slow
//! response can never overwrite a newer one.

#[cfg(test)]
#[path = "resource_list_test.rs"]
mod resource_list_test;

use leptos::prelude::*;
use serde_json::Value;
use storefront::api::Resource;
use storefront::listing::{FetchScope, PageState, format_date, load_page, search_debounce};
use storefront::workflow::storefront::total_stock;

use crate::components::loading::Loading;
use crate::components::pagination::{PageSizeSelect, Pagination};
use crate::pages::errors::NotFoundPage;
use crate::state::session::SessionContext;
use crate::util::task::{sleep, spawn};

// =============================================================================
// COLUMNS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Text(&'static str),
    /// `field.name`-style lookup on a populated relation.
    Relation(&'static str, &'static str),
    Money(&'static str),
    /// Length of a populated to-many relation.
    Count(&'static str),
    Stock,
    Paid,
    Role,
    Created,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub cell: Cell,
}

const fn col(label: &'static str, cell: Cell) -> Column {
    Column { label, cell }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListSpec {
    pub title: &'static str,
    /// `/dashboard/<section>`; entries open at `<base>/<key>`.
    pub base: &'static str,
    pub add_href: &'static str,
    pub columns: &'static [Column],
}

/// List screen layout for `resource`; `None` for collections without one.
pub fn list_spec(resource: Resource) -> Option<ListSpec> {
    let spec = match resource {
        Resource::Users => ListSpec {
            title: "Users",
            base: "/dashboard/users",
            add_href: "/dashboard/user/add",
            columns: const { &[col("Username", Cell::Text("username")), col("Email", Cell::Text("email")), col("Role", Cell::Role)] },
        },
        Resource::Customers => ListSpec {
            title: "Customers",
            base: "/dashboard/customers",
            add_href: "/dashboard/customer/add",
            columns: const { &[
                col("Name", Cell::Text("name")),
                col("Contact", Cell::Text("number")),
                col("Type", Cell::Text("type")),
                col("Joined", Cell::Created),
            ] },
        },
        Resource::Traders => ListSpec {
            title: "Traders",
            base: "/dashboard/traders",
            add_href: "/dashboard/trader/add",
            columns: const { &[col("Name", Cell::Text("name")), col("Contact", Cell::Text("number")), col("Joined", Cell::Created)] },
        },
        Resource::Orders => ListSpec {
            title: "Orders",
            base: "/dashboard/orders",
            add_href: "/dashboard/order/add",
            columns: const { &[
                col("Customer", Cell::Relation("customer", "name")),
                col("Date", Cell::Created),
                col("Total", Cell::Money("totalAmount")),
                col("Status", Cell::Paid),
            ] },
        },
        Resource::Purchases => ListSpec {
            title: "Purchases",
            base: "/dashboard/purchases",
            add_href: "/dashboard/purchase/add",
            columns: const { &[
                col("Trader", Cell::Relation("trader", "name")),
                col("Date", Cell::Created),
                col("Total", Cell::Money("totalAmount")),
                col("Status", Cell::Paid),
            ] },
        },
        Resource::Categories => ListSpec {
            title: "Categories",
            base: "/dashboard/categories",
            add_href: "/dashboard/category/add",
            columns: const { &[col("Category", Cell::Text("title")), col("Products", Cell::Count("products")), col("Date", Cell::Created)] },
        },
        Resource::Products => ListSpec {
            title: "Products",
            base: "/dashboard/products",
            add_href: "/dashboard/product/add",
            columns: const { &[
                col("Product", Cell::Text("title")),
                col("Price", Cell::Money("price")),
                col("Total stock", Cell::Stock),
                col("Added", Cell::Created),
            ] },
        },
        _ => return None,
    };
    Some(spec)
}

/// Display text of one cell.
pub fn cell_text(cell: Cell, entry: &Value) -> String {
    match cell {
        Cell::Text(field) => match &entry[field] {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        },
        Cell::Relation(relation, field) => entry[relation][field].as_str().unwrap_or("-").to_owned(),
        Cell::Money(field) => entry[field].as_f64().map(|v| format!("{v:.2} EGP")).unwrap_or_default(),
        Cell::Count(relation) => entry[relation].as_array().map_or(0, Vec::len).to_string(),
        Cell::Stock => total_stock(entry).to_string(),
        Cell::Paid => (if entry["paid"].as_bool().unwrap_or(false) { "Paid" } else { "Pending" }).to_owned(),
        Cell::Role => entry["role"]["name"].as_str().unwrap_or_default().to_owned(),
        Cell::Created => entry["createdAt"].as_str().and_then(format_date).unwrap_or_default(),
    }
}

/// Key an entry is opened and deleted by: numeric id for users, document
/// id for everything else.
pub fn entry_key(resource: Resource, entry: &Value) -> Option<String> {
    if resource == Resource::Users {
        entry["id"].as_i64().map(|id| id.to_string())
    } else {
        entry["documentId"].as_str().map(str::to_owned)
    }
}

// =============================================================================
// PAGE
// =============================================================================

#[component]
pub fn ResourceListPage(resource: Resource) -> impl IntoView {
    let Some(spec) = list_spec(resource) else {
        return view! { <NotFoundPage/> }.into_any();
    };
    let ctx = expect_context::<SessionContext>();
    let state = RwSignal::new(PageState::new());
    let draft = RwSignal::new(String::new());
    let rows = RwSignal::new(Vec::<Value>::new());
    let total = RwSignal::new(0_u64);
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let reload = RwSignal::new(0_u32);

    let search_scope = FetchScope::new();
    let fetch_scope = FetchScope::new();
    on_cleanup({
        let (search, fetch) = (search_scope.clone(), fetch_scope.clone());
        move || {
            search.close();
            fetch.close();
        }
    });

    Effect::new(move || {
        let text = draft.get();
        let ticket = search_scope.begin();
        let scope = search_scope.clone();
        spawn(async move {
            sleep(search_debounce(&text)).await;
            scope.commit(ticket, text, |text| state.update(|s| s.set_search(&text)));
        });
    });

    let api = ctx.api();
    Effect::new(move || {
        reload.track();
        let snapshot = state.get();
        let ticket = fetch_scope.begin();
        loading.set(true);
        let api = api.clone();
        let scope = fetch_scope.clone();
        spawn(async move {
            let outcome = load_page(&api, resource, &snapshot).await;
            scope.commit(ticket, outcome, |outcome| {
                match outcome {
                    Ok(page) => {
                        total.set(page.total);
                        rows.set(page.items);
                        error.set(None);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, resource = resource.path(), "list fetch failed");
                        error.set(Some(e.to_string()));
                    }
                }
                loading.set(false);
            });
        });
    });

    let api = ctx.api();
    let on_delete = Callback::new(move |key: String| {
        let api = api.clone();
        spawn(async move {
            match api.delete_entry(resource, &key).await {
                Ok(()) => {
                    tracing::info!(resource = resource.path(), %key, "entry deleted");
                    state.update(PageState::after_delete);
                    draft.set(String::new());
                    reload.update(|n| *n += 1);
                }
                Err(e) => {
                    tracing::warn!(error = %e, resource = resource.path(), %key, "delete failed");
                    error.set(Some(e.to_string()));
                }
            }
        });
    });

    let page = Signal::derive(move || state.with(PageState::page));
    let limit = Signal::derive(move || state.with(PageState::limit));
    let count = Signal::derive(move || state.with(|s| s.page_count(total.get())));

    view! {
        <section class="resource-list">
            <header class="resource-list__header">
                <h1>{spec.title}</h1>
                <a class="btn btn--primary" href=spec.add_href>"Add"</a>
            </header>
            <div class="resource-list__tools">
                <input
                    class="search-box"
                    type="search"
                    placeholder="Search..."
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                />
                <PageSizeSelect limit=limit on_change=Callback::new(move |size| state.update(|s| s.set_limit(size)))/>
            </div>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || !loading.get() fallback=|| view! { <Loading/> }>
                <table class="resource-list__table">
                    <thead>
                        <tr>
                            {spec.columns.iter().map(|c| view! { <th>{c.label}</th> }).collect_view()}
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            rows.get()
                                .into_iter()
                                .map(|entry| {
                                    let key = entry_key(resource, &entry).unwrap_or_default();
                                    let href = format!("{}/{key}", spec.base);
                                    view! {
                                        <tr>
                                            {spec.columns.iter().map(|c| view! { <td>{cell_text(c.cell, &entry)}</td> }).collect_view()}
                                            <td class="resource-list__actions">
                                                <a href=href>"Edit"</a>
                                                <button class="btn btn--danger" on:click=move |_| on_delete.run(key.clone())>
                                                    "Delete"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </Show>
            <Pagination page=page count=count on_select=Callback::new(move |n| state.update(|s| s.set_page(n)))/>
        </section>
    }
    .into_any()
}
