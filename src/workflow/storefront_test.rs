use std::sync::Arc;

use super::*;
use crate::storage::MemoryStore;
use crate::test_support::MockCms;

#[test]
fn search_is_case_insensitive_on_title() {
    let pairs = product_search_query("Lamp").to_pairs();
    assert!(pairs.contains(&("filters[title][$containsi]".to_owned(), "Lamp".to_owned())));
    assert!(pairs.contains(&("populate".to_owned(), "*".to_owned())));
}

#[test]
fn total_stock_sums_inventory_rows() {
    let product = serde_json::json!({ "inventories": [{ "quantity": 2 }, { "quantity": 4 }, {}] });
    assert_eq!(total_stock(&product), 6);
    assert_eq!(total_stock(&serde_json::json!({})), 0);
}

#[tokio::test]
async fn summary_counts_collections_and_flags_low_stock() {
    let cms = MockCms::spawn().await;
    cms.respond("GET", "/users", 200, serde_json::json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }]));
    cms.respond(
        "GET",
        "/products",
        200,
        serde_json::json!({
            "data": [
                { "documentId": "p1", "inventories": [{ "quantity": 50 }] },
                { "documentId": "p2", "inventories": [{ "quantity": 2 }, { "quantity": 3 }] },
                { "documentId": "p3", "inventories": [] }
            ],
            "meta": { "pagination": { "total": 42 } }
        }),
    );
    cms.respond(
        "GET",
        "/orders",
        200,
        serde_json::json!({
            "data": [{ "totalAmount": 10.5 }, { "totalAmount": 4.5 }],
            "meta": { "pagination": { "total": 17 } }
        }),
    );
    cms.respond("GET", "/purchases", 200, serde_json::json!({ "data": [], "meta": { "pagination": { "total": 8 } } }));
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));

    let summary = dashboard_summary(&api).await.unwrap();

    assert_eq!((summary.users, summary.products, summary.orders, summary.purchases), (3, 42, 17, 8));
    assert!((summary.recent_orders_total - 15.0).abs() < f64::EPSILON);
    assert_eq!(summary.low_stock_count, 2);
    assert_eq!(summary.low_stock[0]["documentId"], "p2");
}

#[tokio::test]
async fn summary_fails_when_any_collection_fails() {
    let cms = MockCms::spawn().await;
    cms.respond("GET", "/users", 200, serde_json::json!([]));
    cms.respond("GET", "/products", 200, serde_json::json!({ "data": [] }));
    cms.respond("GET", "/orders", 403, serde_json::json!({ "error": { "message": "Forbidden" } }));
    cms.respond("GET", "/purchases", 200, serde_json::json!({ "data": [] }));
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));

    let err = dashboard_summary(&api).await.unwrap_err();

    assert_eq!(err.error_code(), "E_FORBIDDEN");
}

#[tokio::test]
async fn featured_products_come_from_the_featured_page() {
    let cms = MockCms::spawn().await;
    cms.respond(
        "GET",
        "/pages",
        200,
        serde_json::json!({ "data": [{ "name": "featured-products", "products": [{ "documentId": "p1" }, { "documentId": "p2" }] }] }),
    );
    let api = cms.client(Arc::new(MemoryStore::new()));

    let products = featured_products(&api).await.unwrap();

    assert_eq!(products.len(), 2);
    let query = cms.requests_to("/pages")[0].query.clone().unwrap_or_default();
    assert!(query.contains("filters%5Bname%5D%5B%24eq%5D=featured-products"), "query was {query}");
}

#[tokio::test]
async fn missing_featured_page_yields_nothing() {
    let cms = MockCms::spawn().await;
    cms.respond("GET", "/pages", 200, serde_json::json!({ "data": [] }));
    let api = cms.client(Arc::new(MemoryStore::new()));

    assert!(featured_products(&api).await.unwrap().is_empty());
}

#[tokio::test]
async fn category_products_filter_on_the_relation() {
    let cms = MockCms::spawn().await;
    cms.respond("GET", "/products", 200, serde_json::json!({ "data": [{ "documentId": "p1" }] }));
    let api = cms.client(Arc::new(MemoryStore::new()));

    let products = category_products(&api, "cat-9").await.unwrap();

    assert_eq!(products.len(), 1);
    let query = cms.requests_to("/products")[0].query.clone().unwrap_or_default();
    assert!(query.contains("filters%5Bcategories%5D%5BdocumentId%5D%5B%24eq%5D=cat-9"), "query was {query}");
}
