use std::sync::Arc;

use super::*;
use crate::storage::MemoryStore;
use crate::test_support::MockCms;

// =============================================================================
// FETCH SCOPE
// =============================================================================

#[test]
fn newest_ticket_is_current() {
    let scope = FetchScope::new();
    let first = scope.begin();
    assert!(scope.is_current(first));

    let second = scope.begin();
    assert!(!scope.is_current(first));
    assert!(scope.is_current(second));
}

#[test]
fn closed_scope_rejects_every_ticket() {
    let scope = FetchScope::new();
    let ticket = scope.begin();
    scope.clone().close();

    assert!(scope.is_closed());
    assert!(!scope.is_current(ticket));
    assert!(!scope.is_current(scope.begin()));
}

#[test]
fn commit_runs_only_for_current_ticket() {
    let scope = FetchScope::new();
    let stale = scope.begin();
    let fresh = scope.begin();
    let mut committed = Vec::new();

    assert!(!scope.commit(stale, "old", |v| committed.push(v)));
    assert!(scope.commit(fresh, "new", |v| committed.push(v)));
    assert_eq!(committed, vec!["new"]);
}

#[tokio::test]
async fn late_response_after_unmount_is_dropped() {
    let scope = FetchScope::new();
    let ticket = scope.begin();
    let handle = {
        let scope = scope.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            scope.commit(ticket, 1, |_| panic!("committed after close"))
        })
    };
    scope.close();
    assert!(!handle.await.unwrap());
}

#[test]
fn debounce_only_for_non_empty_query() {
    assert_eq!(search_debounce("lap"), Duration::from_millis(500));
    assert_eq!(search_debounce(""), Duration::ZERO);
    assert_eq!(search_debounce("   "), Duration::ZERO);
}

// =============================================================================
// PAGE STATE
// =============================================================================

#[test]
fn search_and_limit_changes_reset_page() {
    let mut state = PageState::new();
    assert_eq!((state.page(), state.limit()), (1, DEFAULT_LIMIT));

    state.set_page(4);
    state.set_search("shoe");
    assert_eq!(state.page(), 1);

    state.set_page(3);
    state.set_search("shoe");
    assert_eq!(state.page(), 3, "same text keeps the page");

    state.set_limit(10);
    assert_eq!((state.page(), state.limit()), (1, 10));
}

#[test]
fn delete_resets_page_and_search() {
    let mut state = PageState::new();
    state.set_search("old");
    state.set_page(2);

    state.after_delete();

    assert_eq!(state.page(), 1);
    assert_eq!(state.search(), "");
}

#[test]
fn set_page_clamps_to_one() {
    let mut state = PageState::new();
    state.set_page(0);
    assert_eq!(state.page(), 1);
}

#[test]
fn query_uses_resource_search_field() {
    let mut state = PageState::new();
    state.set_search("acme");
    state.set_page(2);

    let pairs = state.query(Resource::Traders).to_pairs();

    assert!(pairs.contains(&("pagination[page]".to_owned(), "2".to_owned())));
    assert!(pairs.contains(&("pagination[pageSize]".to_owned(), "5".to_owned())));
    assert!(pairs.contains(&("filters[name][$contains]".to_owned(), "acme".to_owned())));
}

#[test]
fn page_count_rounds_up_with_minimum_one() {
    assert_eq!(page_count(0, 5), 1);
    assert_eq!(page_count(5, 5), 1);
    assert_eq!(page_count(6, 5), 2);
    assert_eq!(page_count(21, 10), 3);
    assert_eq!(page_count(7, 0), 1);
}

// =============================================================================
// USERS PAGING
// =============================================================================

fn seven_users() -> serde_json::Value {
    let names = ["amir", "bassem", "carla", "dina", "emad", "farah", "gamal"];
    serde_json::Value::Array(
        names
            .iter()
            .enumerate()
            .map(|(i, name)| serde_json::json!({ "id": i + 1, "username": name, "role": { "name": "User" } }))
            .collect(),
    )
}

#[tokio::test]
async fn bare_user_array_is_paged_locally() {
    let cms = MockCms::spawn().await;
    cms.respond("GET", "/users", 200, seven_users());
    let api = cms.client(Arc::new(MemoryStore::new()));
    let mut state = PageState::new();

    let first = load_page(&api, Resource::Users, &state).await.unwrap();
    assert_eq!(first.total, 7);
    assert_eq!(state.page_count(first.total), 2);
    assert_eq!(first.items.len(), 5);

    state.set_page(2);
    let second = load_page(&api, Resource::Users, &state).await.unwrap();
    let names: Vec<_> = second.items.iter().map(|u| u["username"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["farah", "gamal"]);

    let query = cms.requests_to("/users")[0].query.clone().unwrap();
    assert_eq!(query, "populate=role");
}

#[tokio::test]
async fn user_search_filters_before_paging() {
    let cms = MockCms::spawn().await;
    cms.respond("GET", "/users", 200, seven_users());
    let api = cms.client(Arc::new(MemoryStore::new()));
    let mut state = PageState::new();
    state.set_search("A");
    state.set_limit(10);

    let page = load_page(&api, Resource::Users, &state).await.unwrap();

    // case-insensitive; every name has an "a"
    assert_eq!(page.total, 7);
    state.set_search("ra");
    let page = load_page(&api, Resource::Users, &state).await.unwrap();
    let names: Vec<_> = page.items.iter().map(|u| u["username"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["farah"]);
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn other_collections_page_on_the_server() {
    let cms = MockCms::spawn().await;
    cms.respond(
        "GET",
        "/traders",
        200,
        serde_json::json!({
            "data": [{ "documentId": "t1", "name": "Acme" }],
            "meta": { "pagination": { "page": 3, "pageSize": 5, "pageCount": 3, "total": 11 } }
        }),
    );
    let api = cms.client(Arc::new(MemoryStore::new()));
    let mut state = PageState::new();
    state.set_page(3);

    let page = load_page(&api, Resource::Traders, &state).await.unwrap();

    assert_eq!(page.total, 11);
    assert_eq!(state.page_count(page.total), 3);
    let query = cms.requests_to("/traders")[0].query.clone().unwrap();
    assert!(query.contains("pagination%5Bpage%5D=3"), "query was {query}");
}

// =============================================================================
// DATES
// =============================================================================

#[test]
fn format_date_renders_iso_timestamps() {
    assert_eq!(format_date("2024-03-07T15:04:05.123Z").as_deref(), Some("2024-03-07"));
    assert_eq!(format_date("2024-12-31T23:30:00+02:00").as_deref(), Some("2024-12-31"));
    assert_eq!(format_date("2024-01-02").as_deref(), Some("2024-01-02"));
}

#[test]
fn format_date_rejects_garbage() {
    assert_eq!(format_date("yesterday"), None);
    assert_eq!(format_date(""), None);
}
