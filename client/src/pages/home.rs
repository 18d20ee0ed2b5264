//! Storefront landing page: featured products and the product search box.
//!
//! Search is debounced; every keystroke takes a fetch ticket so only the
//! newest query's results are shown.

use leptos::prelude::*;
use serde_json::Value;
use storefront::listing::{FetchScope, search_debounce};
use storefront::workflow::storefront::{featured_products, search_products};

use crate::components::product_card::ProductCard;
use crate::state::session::SessionContext;
use crate::util::task::{sleep, spawn};

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let featured = RwSignal::new(Vec::<Value>::new());
    let term = RwSignal::new(String::new());
    let results = RwSignal::new(Vec::<Value>::new());
    let searching = RwSignal::new(false);

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });

    {
        let api = ctx.api();
        let scope = scope.clone();
        let ticket = scope.begin();
        spawn(async move {
            match featured_products(&api).await {
                Ok(items) => {
                    scope.commit(ticket, items, |items| featured.set(items));
                }
                Err(e) => tracing::warn!(error = %e, "featured products fetch failed"),
            }
        });
    }

    // Separate scope so a search never invalidates the featured fetch.
    let search_scope = FetchScope::new();
    on_cleanup({
        let scope = search_scope.clone();
        move || scope.close()
    });
    let api = ctx.api();
    Effect::new(move || {
        let query = term.get();
        let ticket = search_scope.begin();
        if query.trim().is_empty() {
            results.set(Vec::new());
            searching.set(false);
            return;
        }
        searching.set(true);
        let api = api.clone();
        let scope = search_scope.clone();
        spawn(async move {
            sleep(search_debounce(&query)).await;
            if !scope.is_current(ticket) {
                return;
            }
            let outcome = search_products(&api, &query).await;
            scope.commit(ticket, outcome, |outcome| {
                match outcome {
                    Ok(items) => results.set(items),
                    Err(e) => tracing::warn!(error = %e, "product search failed"),
                }
                searching.set(false);
            });
        });
    });

    view! {
        <div class="home-page">
            <section class="hero">
                <h1>"Professional tools for every job"</h1>
                <input
                    class="search-box"
                    type="search"
                    placeholder="Search products..."
                    prop:value=move || term.get()
                    on:input=move |ev| term.set(event_target_value(&ev))
                />
            </section>
            <Show when=move || !term.with(|t| t.trim().is_empty())>
                <section class="search-results">
                    <Show when=move || !searching.get() fallback=|| view! { <p>"Searching..."</p> }>
                        <Show when=move || !results.with(Vec::is_empty) fallback=|| view! { <p>"No products found."</p> }>
                            <div class="product-grid">
                                {move || results.get().into_iter().map(|p| view! { <ProductCard product=p/> }).collect_view()}
                            </div>
                        </Show>
                    </Show>
                </section>
            </Show>
            <section class="featured">
                <h2>"Featured products"</h2>
                <div class="product-grid">
                    {move || featured.get().into_iter().map(|p| view! { <ProductCard product=p/> }).collect_view()}
                </div>
            </section>
        </div>
    }
}
