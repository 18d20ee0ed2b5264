//! Storefront section page (`/pages/:page_name`): category menu on the
//! side, products of the selected category in the grid.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use serde_json::Value;
use storefront::listing::FetchScope;
use storefront::workflow::storefront::{category_products, section_categories};

use crate::components::loading::Loading;
use crate::components::product_card::ProductCard;
use crate::state::session::SessionContext;
use crate::util::task::spawn;

#[component]
pub fn SectionPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let params = use_params_map();
    let categories = RwSignal::new(Vec::<Value>::new());
    let active = RwSignal::new(None::<String>);
    let products = RwSignal::new(Vec::<Value>::new());
    let loading = RwSignal::new(false);

    let menu_scope = FetchScope::new();
    let product_scope = FetchScope::new();
    on_cleanup({
        let (menu, product) = (menu_scope.clone(), product_scope.clone());
        move || {
            menu.close();
            product.close();
        }
    });

    let api = ctx.api();
    Effect::new(move || {
        let page_name = params.with(|p| p.get("page_name").unwrap_or_default());
        let ticket = menu_scope.begin();
        products.set(Vec::new());
        active.set(None);
        let api = api.clone();
        let scope = menu_scope.clone();
        spawn(async move {
            match section_categories(&api, &page_name).await {
                Ok(items) => {
                    scope.commit(ticket, items, |items| {
                        let first = items.first().and_then(|c| c["documentId"].as_str()).map(str::to_owned);
                        categories.set(items);
                        active.set(first);
                    });
                }
                Err(e) => tracing::warn!(error = %e, %page_name, "section menu fetch failed"),
            }
        });
    });

    let api = ctx.api();
    Effect::new(move || {
        let Some(category) = active.get() else {
            return;
        };
        let ticket = product_scope.begin();
        loading.set(true);
        let api = api.clone();
        let scope = product_scope.clone();
        spawn(async move {
            let outcome = category_products(&api, &category).await;
            scope.commit(ticket, outcome, |outcome| {
                match outcome {
                    Ok(items) => products.set(items),
                    Err(e) => tracing::warn!(error = %e, %category, "category products fetch failed"),
                }
                loading.set(false);
            });
        });
    });

    view! {
        <div class="section-page">
            <aside class="section-page__menu">
                <For
                    each=move || categories.get()
                    key=|c| c["documentId"].as_str().unwrap_or_default().to_owned()
                    children=move |category| {
                        let id = category["documentId"].as_str().unwrap_or_default().to_owned();
                        let title = category["title"].as_str().unwrap_or_default().to_owned();
                        let selected = id.clone();
                        view! {
                            <button
                                class="section-page__category"
                                class:section-page__category--active=move || active.with(|a| a.as_deref() == Some(selected.as_str()))
                                on:click=move |_| active.set(Some(id.clone()))
                            >
                                {title}
                            </button>
                        }
                    }
                />
            </aside>
            <Show when=move || !loading.get() fallback=|| view! { <Loading/> }>
                <div class="product-grid">
                    {move || products.get().into_iter().map(|p| view! { <ProductCard product=p/> }).collect_view()}
                </div>
            </Show>
        </div>
    }
}
