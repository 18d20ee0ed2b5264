use std::sync::Arc;

use super::*;
use crate::storage::MemoryStore;
use crate::test_support::MockCms;

// =============================================================
// ListQuery
// =============================================================

#[test]
fn list_query_renders_bracket_notation_in_order() {
    let pairs = ListQuery::new()
        .page(2)
        .page_size(10)
        .filter("title", FilterOp::Contains, "drill")
        .sort("createdAt", SortOrder::Desc)
        .populate("categories")
        .populate("images")
        .to_pairs();
    let expected: Vec<(String, String)> = [
        ("pagination[page]", "2"),
        ("pagination[pageSize]", "10"),
        ("filters[title][$contains]", "drill"),
        ("sort", "createdAt:desc"),
        ("populate", "categories"),
        ("populate", "images"),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
    .collect();
    assert_eq!(pairs, expected);
}

#[test]
fn blank_filter_value_is_dropped() {
    let query = ListQuery::new().filter("title", FilterOp::Contains, "   ");
    assert!(query.to_pairs().is_empty());
}

#[test]
fn dotted_filter_field_targets_relation() {
    let pairs = ListQuery::new().filter("categories.documentId", FilterOp::Eq, "cat-1").to_pairs();
    assert_eq!(pairs, vec![("filters[categories][documentId][$eq]".to_owned(), "cat-1".to_owned())]);
}

#[test]
fn dotted_populate_nests_relation() {
    let pairs = ListQuery::new().populate("products.images").to_pairs();
    assert_eq!(pairs, vec![("populate[products][populate][images]".to_owned(), "true".to_owned())]);
}

#[test]
fn plain_relations_switch_to_object_form_next_to_nested_ones() {
    let pairs = ListQuery::new().populate("trader").populate("purchase_items.product").to_pairs();
    assert_eq!(
        pairs,
        vec![
            ("populate[trader]".to_owned(), "true".to_owned()),
            ("populate[purchase_items][populate][product]".to_owned(), "true".to_owned()),
        ]
    );
}

#[test]
fn page_zero_is_clamped_to_first_page() {
    assert_eq!(ListQuery::new().page(0).to_pairs()[0].1, "1");
}

#[test]
fn resource_paths_and_search_fields() {
    assert_eq!(Resource::OrderItems.path(), "/order-items");
    assert_eq!(Resource::Products.entry_path("p1"), "/products/p1");
    assert_eq!(Resource::Categories.search_field(), "title");
    assert_eq!(Resource::Customers.search_field(), "name");
    assert_eq!(Resource::Users.search_field(), "username");
}

// =============================================================
// CRUD against the mock CMS
// =============================================================

#[tokio::test]
async fn list_decodes_envelope_and_sends_query() {
    let cms = MockCms::spawn().await;
    cms.respond(
        "GET",
        "/categories",
        200,
        serde_json::json!({
            "data": [{ "documentId": "c1", "title": "Saws" }],
            "meta": { "pagination": { "page": 1, "pageSize": 5, "pageCount": 4, "total": 17 } }
        }),
    );
    let api = cms.client(Arc::new(MemoryStore::new()));

    let page: ListPage<serde_json::Value> = api
        .list(Resource::Categories, &ListQuery::new().page(1).page_size(5).filter("title", FilterOp::Contains, "saw"))
        .await
        .unwrap();

    assert_eq!(page.total, 17);
    assert_eq!(page.items[0]["title"], "Saws");
    let query = cms.requests_to("/categories")[0].query.clone().unwrap();
    assert!(query.contains("pagination%5Bpage%5D=1"), "query was {query}");
    assert!(query.contains("filters%5Btitle%5D%5B%24contains%5D=saw"), "query was {query}");
}

#[tokio::test]
async fn list_accepts_bare_array_from_users_collection() {
    let cms = MockCms::spawn().await;
    cms.respond("GET", "/users", 200, serde_json::json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }]));
    let api = cms.client(Arc::new(MemoryStore::new()));

    let page: ListPage<serde_json::Value> = api.list(Resource::Users, &ListQuery::new()).await.unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 3);
}

#[tokio::test]
async fn create_wraps_payload_in_data() {
    let cms = MockCms::spawn().await;
    cms.respond("POST", "/traders", 201, serde_json::json!({ "data": { "documentId": "t9", "name": "Acme" } }));
    let api = cms.client(Arc::new(MemoryStore::new()));

    let created: crate::api::types::EntryRef = api
        .create_entry(Resource::Traders, &serde_json::json!({ "name": "Acme" }))
        .await
        .unwrap();

    assert_eq!(created.document_id.as_deref(), Some("t9"));
    assert_eq!(
        cms.requests_to("/traders")[0].body,
        Some(serde_json::json!({ "data": { "name": "Acme" } }))
    );
}

#[tokio::test]
async fn update_and_delete_address_document_id() {
    let cms = MockCms::spawn().await;
    cms.respond("PUT", "/products/p1", 200, serde_json::json!({ "data": { "documentId": "p1" } }));
    cms.respond("DELETE", "/products/p1", 200, serde_json::json!({}));
    let api = cms.client(Arc::new(MemoryStore::new()));

    let _: serde_json::Value = api
        .update_entry(Resource::Products, "p1", &serde_json::json!({ "price": 10 }))
        .await
        .unwrap();
    api.delete_entry(Resource::Products, "p1").await.unwrap();

    let methods: Vec<_> = cms.requests_to("/products/p1").into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec!["PUT", "DELETE"]);
}

#[tokio::test]
async fn get_entry_unwraps_data() {
    let cms = MockCms::spawn().await;
    cms.respond("GET", "/products/p1", 200, serde_json::json!({ "data": { "documentId": "p1", "title": "Hammer" } }));
    let api = cms.client(Arc::new(MemoryStore::new()));

    let entry: serde_json::Value = api
        .get_entry(Resource::Products, "p1", &ListQuery::new().populate_all())
        .await
        .unwrap();

    assert_eq!(entry["title"], "Hammer");
    assert_eq!(cms.requests_to("/products/p1")[0].query.as_deref(), Some("populate=*"));
}
