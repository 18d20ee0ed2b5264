//! Public product page.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use serde_json::Value;
use storefront::listing::FetchScope;
use storefront::workflow::storefront::{product_detail, total_stock};

use crate::components::loading::Loading;
use crate::state::session::SessionContext;
use crate::util::task::spawn;

#[component]
pub fn ProductPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let params = use_params_map();
    let product = RwSignal::new(None::<Value>);
    let missing = RwSignal::new(false);

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });

    let api = ctx.api();
    Effect::new(move || {
        let id = params.with(|p| p.get("id").unwrap_or_default());
        let ticket = scope.begin();
        let api = api.clone();
        let scope = scope.clone();
        spawn(async move {
            let outcome = product_detail(&api, &id).await;
            scope.commit(ticket, outcome, |outcome| match outcome {
                Ok(entry) => product.set(Some(entry)),
                Err(e) => {
                    tracing::warn!(error = %e, %id, "product fetch failed");
                    missing.set(true);
                }
            });
        });
    });

    move || {
        if missing.get() {
            return view! { <p class="product-page__missing">"Product not found."</p> }.into_any();
        }
        let Some(entry) = product.get() else {
            return view! { <Loading/> }.into_any();
        };
        let title = entry["title"].as_str().unwrap_or_default().to_owned();
        let brand = entry["brand"].as_str().unwrap_or_default().to_owned();
        let description = entry["description"].as_str().unwrap_or("No description available yet.").to_owned();
        let price = entry["price"].as_f64().map(|p| format!("{p:.2} EGP")).unwrap_or_default();
        let stock = total_stock(&entry);
        let categories: Vec<String> = entry["categories"]
            .as_array()
            .map(|list| list.iter().filter_map(|c| c["title"].as_str().map(str::to_owned)).collect())
            .unwrap_or_default();
        view! {
            <article class="product-page">
                <span class="product-page__brand">{brand}</span>
                <h1>{title}</h1>
                <p class="product-page__price">{price}</p>
                <p class="product-page__stock">{if stock > 0 { "In stock" } else { "Out of stock" }}</p>
                <p class="product-page__description">{description}</p>
                <ul class="product-page__categories">
                    {categories.into_iter().map(|c| view! { <li>{c}</li> }).collect_view()}
                </ul>
            </article>
        }
        .into_any()
    }
}
