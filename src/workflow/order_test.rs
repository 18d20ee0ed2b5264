use std::sync::Arc;

use super::*;
use crate::storage::MemoryStore;
use crate::test_support::MockCms;

fn product(id: &str, price: f64) -> ProductOption {
    ProductOption { document_id: id.to_owned(), title: format!("Product {id}"), price: Some(price) }
}

fn ready_draft() -> OrderDraft {
    let mut draft = OrderDraft::new();
    draft.set_customer("cust-1");
    draft.set_recipient("Mona");
    draft.add_product(&product("p1", 10.0));
    draft.add_product(&product("p2", 2.5));
    draft.set_warehouse(0, "wh-a");
    draft.set_warehouse(1, "wh-b");
    draft
}

#[test]
fn same_product_is_added_once() {
    let mut draft = OrderDraft::new();
    assert!(draft.add_product(&product("p1", 10.0)));
    assert!(!draft.add_product(&product("p1", 10.0)));
    assert_eq!(draft.lines().len(), 1);
    assert_eq!(draft.lines()[0].quantity, 1);
}

#[test]
fn line_totals_follow_quantity_and_price() {
    let mut draft = ready_draft();
    draft.set_quantity(0, 3);
    draft.set_price(1, 4.0);
    assert!((draft.lines()[0].total() - 30.0).abs() < f64::EPSILON);
    assert!((draft.total() - 34.0).abs() < f64::EPSILON);

    draft.set_price(1, f64::NAN);
    assert!((draft.lines()[1].price).abs() < f64::EPSILON);
}

#[test]
fn missing_price_defaults_to_zero() {
    let mut draft = OrderDraft::new();
    draft.add_product(&ProductOption { document_id: "p9".into(), title: String::new(), price: None });
    assert!(draft.lines()[0].price.abs() < f64::EPSILON);
}

#[test]
fn remove_line_ignores_out_of_range() {
    let mut draft = ready_draft();
    draft.remove_line(7);
    assert_eq!(draft.lines().len(), 2);
    draft.remove_line(0);
    assert_eq!(draft.lines()[0].product, "p2");
}

#[test]
fn validation_reports_first_gap() {
    let mut draft = OrderDraft::new();
    assert!(matches!(draft.validate(), Err(WorkflowError::Invalid("customer is required"))));
    draft.set_customer("c");
    draft.set_recipient("   ");
    assert!(matches!(draft.validate(), Err(WorkflowError::Invalid("recipient is required"))));
    draft.set_recipient("Mona");
    assert!(matches!(draft.validate(), Err(WorkflowError::Invalid("add at least one product"))));
    draft.add_product(&product("p1", 1.0));
    assert!(matches!(draft.validate(), Err(WorkflowError::Invalid("every line needs a warehouse"))));
    draft.set_warehouse(0, "wh");
    assert!(draft.is_valid());
}

#[tokio::test]
async fn submit_creates_items_then_connected_order() {
    let cms = MockCms::spawn().await;
    cms.respond_seq(
        "POST",
        "/order-items",
        vec![
            (200, serde_json::json!({ "data": { "id": 1, "documentId": "item-1" } })),
            (200, serde_json::json!({ "data": { "id": 2, "documentId": "item-2" } })),
        ],
    );
    cms.respond("POST", "/orders", 200, serde_json::json!({ "data": { "id": 9, "documentId": "order-9" } }));
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));

    let order = ready_draft().submit(&api).await.unwrap();

    assert_eq!(order.document_id.as_deref(), Some("order-9"));
    let items = cms.requests_to("/order-items");
    assert_eq!(items.len(), 2);
    let first = items[0].body.clone().unwrap();
    assert_eq!(first["data"]["product"], serde_json::json!({ "connect": [{ "documentId": "p1" }] }));
    assert_eq!(first["data"]["warehouse"], serde_json::json!({ "connect": [{ "documentId": "wh-a" }] }));
    assert_eq!(first["data"]["quantity"], 1);

    let order_body = cms.requests_to("/orders")[0].body.clone().unwrap();
    assert_eq!(
        order_body["data"]["order_items"],
        serde_json::json!({ "connect": [{ "documentId": "item-1" }, { "documentId": "item-2" }] })
    );
    assert_eq!(order_body["data"]["customer"], serde_json::json!({ "connect": [{ "documentId": "cust-1" }] }));
    assert_eq!(order_body["data"]["addTaxes"], true);
    assert_eq!(order_body["data"]["paid"], false);

    let sequence: Vec<String> = cms.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(sequence, vec!["/api/order-items", "/api/order-items", "/api/orders"]);
}

#[tokio::test]
async fn invalid_draft_sends_nothing() {
    let cms = MockCms::spawn().await;
    let api = cms.client(Arc::new(MemoryStore::new()));

    let err = OrderDraft::new().submit(&api).await.unwrap_err();

    assert_eq!(err.error_code(), "E_INVALID_FORM");
    assert!(cms.requests().is_empty());
}

#[tokio::test]
async fn failed_item_stops_before_order() {
    let cms = MockCms::spawn().await;
    cms.respond("POST", "/order-items", 500, serde_json::json!({}));
    let api = cms.client(Arc::new(MemoryStore::new()));

    let err = ready_draft().submit(&api).await.unwrap_err();

    assert!(err.retryable());
    assert_eq!(cms.requests_to("/order-items").len(), 1);
    assert!(cms.requests_to("/orders").is_empty());
}

#[tokio::test]
async fn purchase_connects_trader_and_purchase_items() {
    let cms = MockCms::spawn().await;
    cms.respond("POST", "/purchase-items", 200, serde_json::json!({ "data": { "documentId": "pi-1" } }));
    cms.respond("POST", "/purchases", 200, serde_json::json!({ "data": { "documentId": "pu-1" } }));
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));

    let mut draft = OrderDraft::purchase();
    assert!(matches!(draft.validate(), Err(WorkflowError::Invalid("trader is required"))));
    draft.set_customer("trader-7");
    draft.add_product(&product("p1", 3.0));
    draft.set_warehouse(0, "wh-a");
    draft.set_paid(true);
    assert!(draft.is_valid(), "purchases need no recipient");

    let created = draft.submit(&api).await.unwrap();

    assert_eq!(created.document_id.as_deref(), Some("pu-1"));
    let body = cms.requests_to("/purchases")[0].body.clone().unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "data": {
            "trader": { "connect": [{ "documentId": "trader-7" }] },
            "purchase_items": { "connect": [{ "documentId": "pi-1" }] },
            "paid": true
        } })
    );
    assert!(cms.requests_to("/orders").is_empty());
}

#[test]
fn detail_query_populates_lines_with_products() {
    let pairs = DraftKind::Purchase.detail_query().to_pairs();
    assert!(pairs.contains(&("populate[trader]".to_owned(), "true".to_owned())));
    assert!(pairs.contains(&("populate[purchase_items][populate][product]".to_owned(), "true".to_owned())));
}

#[tokio::test]
async fn payment_and_return_update_the_header() {
    let cms = MockCms::spawn().await;
    cms.respond("PUT", "/purchases/pu-1", 200, serde_json::json!({ "data": { "documentId": "pu-1" } }));
    cms.respond("PUT", "/orders/o-1", 200, serde_json::json!({ "data": { "documentId": "o-1" } }));
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));

    mark_paid(&api, DraftKind::Purchase, "pu-1").await.unwrap();
    mark_returned(&api, DraftKind::Sale, "o-1").await.unwrap();

    let paid = cms.requests_to("/purchases/pu-1")[0].body.clone().unwrap();
    assert_eq!(paid, serde_json::json!({ "data": { "paid": true } }));
    let returned = cms.requests_to("/orders/o-1")[0].body.clone().unwrap();
    assert_eq!(returned, serde_json::json!({ "data": { "orderStatus": "Returned" } }));
}

#[tokio::test]
async fn product_options_decode_price_and_title() {
    let cms = MockCms::spawn().await;
    cms.respond(
        "GET",
        "/products",
        200,
        serde_json::json!({ "data": [{ "documentId": "p1", "title": "Saw", "price": 9.5 }, { "documentId": "p2" }] }),
    );
    let api = cms.client(Arc::new(MemoryStore::new()));

    let options = product_options(&api).await.unwrap();

    assert_eq!(options[0], ProductOption { document_id: "p1".to_owned(), title: "Saw".to_owned(), price: Some(9.5) });
    assert_eq!(options[1].price, None);
}

// =============================================================================
// QUICK PRODUCT
// =============================================================================

#[tokio::test]
async fn quick_product_is_created_and_added_as_line() {
    let cms = MockCms::spawn().await;
    cms.respond(
        "POST",
        "/products",
        200,
        serde_json::json!({ "data": { "documentId": "p-new", "title": "Cable Ties (100)", "price": 3.5 } }),
    );
    let api = cms.client(Arc::new(MemoryStore::with_token("jwt")));
    let quick = QuickProduct { title: " Cable Ties (100) ".to_owned(), price: 3.5, ..QuickProduct::default() };

    let created = quick_create_product(&api, &quick).await.unwrap();
    let mut draft = OrderDraft::purchase();
    assert!(draft.add_product(&created));

    let body = cms.requests_to("/products")[0].body.clone().unwrap();
    assert_eq!(body["data"]["title"], "Cable Ties (100)");
    assert_eq!(body["data"]["slug"], "cable-ties-100");
    assert_eq!(body["data"]["showOnWebsite"], false);
    assert_eq!(body["data"]["productStatus"], "published");
    assert_eq!(draft.lines()[0].product, "p-new");
    assert!((draft.lines()[0].price - 3.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn quick_product_needs_a_title() {
    let cms = MockCms::spawn().await;
    let api = cms.client(Arc::new(MemoryStore::new()));

    let err = quick_create_product(&api, &QuickProduct::default()).await.unwrap_err();

    assert!(matches!(err, WorkflowError::MissingField("title")));
    assert!(cms.requests().is_empty());
}
