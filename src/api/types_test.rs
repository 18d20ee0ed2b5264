use super::*;

// =============================================================
// Identity
// =============================================================

#[test]
fn identity_parses_numeric_role_id() {
    let identity: Identity = serde_json::from_value(serde_json::json!({
        "id": 7,
        "username": "sara",
        "email": "sara@example.com",
        "role": { "id": 5, "name": "Manager" }
    }))
    .unwrap();
    assert_eq!(identity.role_id(), Some(RoleId(5)));
    assert_eq!(identity.role.unwrap().name, "Manager");
}

#[test]
fn identity_parses_string_role_id() {
    let identity: Identity = serde_json::from_value(serde_json::json!({
        "username": "sara",
        "email": "sara@example.com",
        "role": { "id": "1995", "name": "Admin" }
    }))
    .unwrap();
    assert_eq!(identity.role_id(), Some(RoleId(1995)));
}

#[test]
fn non_numeric_role_id_is_not_comparable() {
    let identity: Identity = serde_json::from_value(serde_json::json!({
        "username": "sara",
        "email": "sara@example.com",
        "role": { "id": "editor" }
    }))
    .unwrap();
    assert!(identity.role.is_some());
    assert_eq!(identity.role_id(), None);
}

#[test]
fn missing_role_yields_none() {
    let identity: Identity =
        serde_json::from_value(serde_json::json!({ "username": "u", "email": "u@x.io" })).unwrap();
    assert_eq!(identity.role_id(), None);
}

#[test]
fn display_name_uses_full_name_after_separator() {
    let identity = Identity {
        id: 1,
        username: "sara_k:::Sara Khalil".to_owned(),
        email: "s@x.io".to_owned(),
        role: None,
    };
    assert_eq!(identity.display_name(), "Sara Khalil");
    assert_eq!(identity.handle(), "sara_k");
}

#[test]
fn display_name_falls_back_to_username() {
    let identity = Identity { id: 1, username: "admin".to_owned(), email: "a@x.io".to_owned(), role: None };
    assert_eq!(identity.display_name(), "admin");
    assert_eq!(identity.handle(), "admin");

    let blank_name = Identity { username: "admin:::  ".to_owned(), ..identity };
    assert_eq!(blank_name.display_name(), "admin:::  ");
}

// =============================================================
// Envelopes
// =============================================================

#[test]
fn collection_reads_pagination_meta() {
    let body: Collection<serde_json::Value> = serde_json::from_value(serde_json::json!({
        "data": [{ "id": 1 }, { "id": 2 }],
        "meta": { "pagination": { "page": 2, "pageSize": 5, "pageCount": 3, "total": 12 } }
    }))
    .unwrap();
    assert_eq!(body.data.len(), 2);
    let pagination = body.meta.pagination.unwrap();
    assert_eq!(pagination.page_size, 5);
    assert_eq!(pagination.total, 12);
}

#[test]
fn connect_builds_document_id_refs() {
    assert_eq!(
        connect(["a", "b"]),
        serde_json::json!({ "connect": [{ "documentId": "a" }, { "documentId": "b" }] })
    );
}

#[test]
fn extract_error_message_reads_strapi_error() {
    let body = r#"{"data":null,"error":{"status":400,"name":"ValidationError","message":"Email or Username are already taken"}}"#;
    assert_eq!(extract_error_message(body).as_deref(), Some("Email or Username are already taken"));
    assert_eq!(extract_error_message("<html>bad gateway</html>"), None);
    assert_eq!(extract_error_message(r#"{"error":{"message":""}}"#), None);
}
