//! Storefront product tile linking to the product page.

use leptos::prelude::*;
use serde_json::Value;

#[component]
pub fn ProductCard(product: Value) -> impl IntoView {
    let href = format!("/products/{}", product["documentId"].as_str().unwrap_or_default());
    let title = product["title"].as_str().unwrap_or_default().to_owned();
    let brand = product["brand"].as_str().unwrap_or_default().to_owned();
    let price = product["price"].as_f64().map(|p| format!("{p:.2} EGP")).unwrap_or_default();
    let image = product["images"][0]["url"].as_str().map(str::to_owned);

    view! {
        <a class="product-card" href=href>
            {image.map(|src| view! { <img class="product-card__image" src=src alt=title.clone()/> })}
            <span class="product-card__brand">{brand}</span>
            <h3 class="product-card__title">{title.clone()}</h3>
            <span class="product-card__price">{price}</span>
        </a>
    }
}
