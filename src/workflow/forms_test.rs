use std::sync::Arc;

use super::*;
use crate::storage::MemoryStore;
use crate::test_support::MockCms;

#[test]
fn only_simple_collections_have_forms() {
    assert!(EntryForm::new(Resource::Customers).is_some());
    assert!(EntryForm::new(Resource::Users).is_some());
    assert!(EntryForm::new(Resource::Orders).is_none());
    assert!(EntryForm::new(Resource::Products).is_none());
}

#[test]
fn validation_names_first_blank_required_field() {
    let mut form = EntryForm::new(Resource::Traders).unwrap();
    let err = form.validate().unwrap_err();
    assert_eq!(err.to_string(), "Name is required");

    form.set("name", "Acme");
    form.set("bogus", "ignored");
    assert!(form.validate().is_ok());
    assert_eq!(form.payload(), serde_json::json!({ "name": "Acme" }));
}

#[test]
fn user_payload_joins_name_and_parses_role() {
    let mut form = EntryForm::new(Resource::Users).unwrap();
    for (key, value) in [
        ("firstName", "Sara"),
        ("lastName", "Lee"),
        ("username", "sara"),
        ("email", "sara@example.com"),
        ("password", "longenough"),
        ("role", "3"),
    ] {
        form.set(key, value);
    }

    assert_eq!(
        form.payload(),
        serde_json::json!({
            "username": "sara",
            "email": "sara@example.com",
            "password": "longenough",
            "role": 3,
            "name": "Sara Lee"
        })
    );
}

#[test]
fn edit_form_prefills_and_relaxes_password() {
    let entry = serde_json::json!({
        "id": 4,
        "username": "sara",
        "email": "sara@example.com",
        "name": "Sara Lee",
        "role": { "id": 3, "name": "Employee" }
    });
    let form = EntryForm::from_entry(Resource::Users, &entry).unwrap();

    assert_eq!(form.get("firstName"), "Sara");
    assert_eq!(form.get("role"), "3");
    assert_eq!(form.get("password"), "");
    assert!(form.validate().is_ok());
    assert!(form.payload().get("password").is_none());
}

#[tokio::test]
async fn create_wraps_collection_entries() {
    let cms = MockCms::spawn().await;
    cms.respond("POST", "/customers", 200, serde_json::json!({ "data": { "documentId": "c1" } }));
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));
    let mut form = EntryForm::new(Resource::Customers).unwrap();
    form.set("name", "Mona");
    form.set("number", "0100");

    form.create(&api).await.unwrap();

    let body = cms.requests_to("/customers")[0].body.clone().unwrap();
    assert_eq!(body, serde_json::json!({ "data": { "name": "Mona", "number": "0100" } }));
}

#[tokio::test]
async fn users_are_sent_unwrapped_by_numeric_id() {
    let cms = MockCms::spawn().await;
    cms.respond("PUT", "/users/4", 200, serde_json::json!({ "id": 4 }));
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));
    let entry = serde_json::json!({ "username": "sara", "email": "s@example.com", "name": "Sara Lee", "role": { "id": 1 } });
    let form = EntryForm::from_entry(Resource::Users, &entry).unwrap();

    form.update(&api, "4").await.unwrap();

    let body = cms.requests_to("/users/4")[0].body.clone().unwrap();
    assert_eq!(body["username"], "sara");
    assert_eq!(body["role"], 1);
    assert!(body.get("data").is_none());
}

#[test]
fn choice_labels_follow_search_field() {
    let warehouse = serde_json::json!({ "id": 2, "documentId": "wh-2", "title": "Main store" });
    let trader = serde_json::json!({ "documentId": "t-1", "name": "Acme" });

    assert_eq!(
        Choice::from_entry(Resource::Warehouses, &warehouse),
        Some(Choice { document_id: "wh-2".to_owned(), id: Some(2), label: "Main store".to_owned() })
    );
    assert_eq!(Choice::from_entry(Resource::Traders, &trader).unwrap().label, "Acme");
    assert_eq!(Choice::from_entry(Resource::Traders, &serde_json::json!({ "name": "x" })), None);
}

#[tokio::test]
async fn choices_load_one_large_page() {
    let cms = MockCms::spawn().await;
    cms.respond(
        "GET",
        "/categories",
        200,
        serde_json::json!({ "data": [{ "id": 3, "documentId": "c3", "title": "Saws" }, { "title": "orphan" }] }),
    );
    let api = cms.client(Arc::new(MemoryStore::new()));

    let options = choices(&api, Resource::Categories).await.unwrap();

    assert_eq!(options.len(), 1);
    assert_eq!(options[0].id, Some(3));
    let query = cms.requests_to("/categories")[0].query.clone().unwrap_or_default();
    assert!(query.contains("pagination%5BpageSize%5D=100"), "query was {query}");
}

#[tokio::test]
async fn load_fetches_users_unwrapped_with_role() {
    let cms = MockCms::spawn().await;
    cms.respond(
        "GET",
        "/users/4",
        200,
        serde_json::json!({ "id": 4, "username": "sara", "email": "s@example.com", "name": "Sara Lee", "role": { "id": 3 } }),
    );
    cms.respond("GET", "/traders/t-1", 200, serde_json::json!({ "data": { "documentId": "t-1", "name": "Acme" } }));
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));

    let user = EntryForm::load(&api, Resource::Users, "4").await.unwrap();
    let trader = EntryForm::load(&api, Resource::Traders, "t-1").await.unwrap();

    assert_eq!(user.get("role"), "3");
    assert_eq!(trader.get("name"), "Acme");
    assert_eq!(cms.requests_to("/users/4")[0].query.as_deref(), Some("populate=role"));
}

#[tokio::test]
async fn load_refuses_collections_without_forms() {
    let cms = MockCms::spawn().await;
    let api = cms.client(Arc::new(MemoryStore::new()));

    let err = EntryForm::load(&api, Resource::Orders, "o-1").await.unwrap_err();

    assert_eq!(err.error_code(), "E_INVALID_FORM");
    assert!(cms.requests().is_empty());
}

// =============================================================
// Category relations
// =============================================================

#[test]
fn category_form_prefills_products_and_image() {
    let entry = serde_json::json!({
        "documentId": "c1",
        "title": "Tools",
        "products": [{ "id": 5 }, { "id": 8 }],
        "image": { "id": 31, "url": "/uploads/tools.png" }
    });
    let mut form = EntryForm::from_entry(Resource::Categories, &entry).unwrap();
    assert!(form.has_relations());
    assert_eq!(form.products(), &[5_i64, 8]);
    assert_eq!(form.image().map(|i| i.url.as_str()), Some("/uploads/tools.png"));

    form.toggle_product(5);
    form.toggle_product(9);
    form.set_image(None);

    assert_eq!(
        form.payload(),
        serde_json::json!({ "title": "Tools", "products": [8, 9], "image": null })
    );
}

#[test]
fn other_forms_carry_no_relations() {
    let mut form = EntryForm::new(Resource::Traders).unwrap();
    form.set("name", "Acme");
    form.toggle_product(5);
    assert!(!form.has_relations());
    assert!(form.payload().get("products").is_none());
}

#[tokio::test]
async fn category_create_sends_selected_products() {
    let cms = MockCms::spawn().await;
    cms.respond("POST", "/categories", 200, serde_json::json!({ "data": { "documentId": "c9" } }));
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));
    let mut form = EntryForm::new(Resource::Categories).unwrap();
    form.set("title", "Garden");
    form.toggle_product(3);
    form.toggle_product(4);
    form.set_image(Some(UploadedFile { id: 77, name: "garden.jpg".to_owned(), url: String::new() }));

    form.create(&api).await.unwrap();

    assert_eq!(
        cms.requests_to("/categories")[0].body,
        Some(serde_json::json!({ "data": { "title": "Garden", "products": [3, 4], "image": 77 } }))
    );
}

#[tokio::test]
async fn category_load_populates_products_and_image() {
    let cms = MockCms::spawn().await;
    cms.respond(
        "GET",
        "/categories/c1",
        200,
        serde_json::json!({ "data": { "documentId": "c1", "title": "Tools", "products": [{ "id": 2 }] } }),
    );
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));

    let form = EntryForm::load(&api, Resource::Categories, "c1").await.unwrap();

    assert_eq!(form.products(), &[2_i64]);
    let query = cms.requests_to("/categories/c1")[0].query.clone().unwrap();
    assert_eq!(query, "populate=products&populate=image");
}

#[tokio::test]
async fn product_choices_filter_by_title() {
    let cms = MockCms::spawn().await;
    cms.respond(
        "GET",
        "/products",
        200,
        serde_json::json!({ "data": [{ "id": 2, "documentId": "p2", "title": "Rake" }] }),
    );
    let api = cms.client(Arc::new(MemoryStore::new()));

    let found = product_choices(&api, "rak").await.unwrap();

    assert_eq!(found[0].id, Some(2));
    assert_eq!(found[0].label, "Rake");
    let query = cms.requests_to("/products")[0].query.clone().unwrap();
    assert!(query.contains("filters%5Btitle%5D%5B%24contains%5D=rak"), "query was {query}");
}
