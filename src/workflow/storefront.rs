//! Read-only queries behind the public storefront and the dashboard home.

#[cfg(test)]
#[path = "storefront_test.rs"]
mod storefront_test;

use serde_json::Value;

use super::WorkflowError;
use crate::api::resources::{FilterOp, SortOrder};
use crate::api::{ApiClient, ListPage, ListQuery, Resource};

/// Products at or below this total stock count as low.
pub const LOW_STOCK_THRESHOLD: i64 = 5;
/// Recent orders and low-stock rows shown on the dashboard home.
pub const HOME_PREVIEW: u32 = 5;
/// Storefront page whose products fill the home carousel.
pub const FEATURED_PAGE: &str = "featured-products";
/// Section pages load everything at once.
pub const SECTION_PAGE_SIZE: u32 = 100;

// =============================================================================
// STOREFRONT
// =============================================================================

/// Case-insensitive title search for the storefront search box.
#[must_use]
pub fn product_search_query(term: &str) -> ListQuery {
    ListQuery::new().filter("title", FilterOp::ContainsI, term).populate_all()
}

/// # Errors
///
/// Any request failure.
pub async fn search_products(api: &ApiClient, term: &str) -> Result<Vec<Value>, WorkflowError> {
    let page: ListPage<Value> = api.list(Resource::Products, &product_search_query(term)).await?;
    Ok(page.items)
}

/// One product with every relation populated.
///
/// # Errors
///
/// Any request failure.
pub async fn product_detail(api: &ApiClient, document_id: &str) -> Result<Value, WorkflowError> {
    Ok(api
        .get_entry(Resource::Products, document_id, &ListQuery::new().populate_all())
        .await?)
}

/// Products attached to the `featured-products` page; empty when the page
/// does not exist.
///
/// # Errors
///
/// Any request failure.
pub async fn featured_products(api: &ApiClient) -> Result<Vec<Value>, WorkflowError> {
    let query = ListQuery::new()
        .filter("name", FilterOp::Eq, FEATURED_PAGE)
        .page_size(SECTION_PAGE_SIZE)
        .populate("products.images");
    let page: ListPage<Value> = api.list(Resource::Pages, &query).await?;
    Ok(page
        .items
        .first()
        .and_then(|entry| entry["products"].as_array())
        .cloned()
        .unwrap_or_default())
}

/// Categories listed under a storefront section page such as `tools`.
///
/// # Errors
///
/// Any request failure.
pub async fn section_categories(api: &ApiClient, page_name: &str) -> Result<Vec<Value>, WorkflowError> {
    let query = ListQuery::new()
        .filter("pages.name", FilterOp::Eq, page_name)
        .page_size(SECTION_PAGE_SIZE)
        .populate("pages");
    let page: ListPage<Value> = api.list(Resource::Categories, &query).await?;
    Ok(page.items)
}

/// Products in one category, by category document id.
///
/// # Errors
///
/// Any request failure.
pub async fn category_products(api: &ApiClient, category: &str) -> Result<Vec<Value>, WorkflowError> {
    let query = ListQuery::new()
        .filter("categories.documentId", FilterOp::Eq, category)
        .page_size(SECTION_PAGE_SIZE)
        .populate_all();
    let page: ListPage<Value> = api.list(Resource::Products, &query).await?;
    Ok(page.items)
}

// =============================================================================
// DASHBOARD HOME
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardSummary {
    pub users: u64,
    pub products: u64,
    pub orders: u64,
    pub purchases: u64,
    /// Sum of `totalAmount` over the recent orders.
    pub recent_orders_total: f64,
    pub recent_orders: Vec<Value>,
    pub low_stock_count: usize,
    pub low_stock: Vec<Value>,
}

/// Sum of `inventories[].quantity` on a product entry.
#[must_use]
pub fn total_stock(product: &Value) -> i64 {
    product["inventories"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|row| row["quantity"].as_i64()).sum())
        .unwrap_or(0)
}

/// Fetch the four collections the home screen summarises, concurrently.
///
/// # Errors
///
/// The first failing request.
pub async fn dashboard_summary(api: &ApiClient) -> Result<DashboardSummary, WorkflowError> {
    let recent = ListQuery::new()
        .page_size(HOME_PREVIEW)
        .sort("createdAt", SortOrder::Desc)
        .populate_all();
    let with_stock = ListQuery::new().populate("inventories");
    let plain = ListQuery::new();

    let (users, products, orders, purchases) = tokio::try_join!(
        api.list::<Value>(Resource::Users, &plain),
        api.list::<Value>(Resource::Products, &with_stock),
        api.list::<Value>(Resource::Orders, &recent),
        api.list::<Value>(Resource::Purchases, &plain),
    )?;

    let low: Vec<Value> = products
        .items
        .into_iter()
        .filter(|product| total_stock(product) <= LOW_STOCK_THRESHOLD)
        .collect();
    let recent_orders_total = orders.items.iter().filter_map(|o| o["totalAmount"].as_f64()).sum();

    Ok(DashboardSummary {
        users: users.total,
        products: products.total,
        orders: orders.total,
        purchases: purchases.total,
        recent_orders_total,
        recent_orders: orders.items,
        low_stock_count: low.len(),
        low_stock: low.into_iter().take(HOME_PREVIEW as usize).collect(),
    })
}
