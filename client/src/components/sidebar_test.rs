use storefront::api::types::{Identity, Role, RoleId};

use super::*;

fn session_with_role(role: i64) -> Session {
    Session::authenticated(Identity {
        id: 1,
        username: "staff".to_owned(),
        email: "staff@example.com".to_owned(),
        role: Some(Role { id: Some(RoleId(role)), name: String::new() }),
    })
}

fn labels(sections: &[Section]) -> Vec<&'static str> {
    sections.iter().map(|s| s.label).collect()
}

#[test]
fn admin_sees_every_section() {
    let policy = PolicyTable::storefront();
    assert_eq!(visible_sections(&policy, &session_with_role(1995)).len(), SECTIONS.len());
}

#[test]
fn catalog_role_sees_only_catalog() {
    let policy = PolicyTable::storefront();
    assert_eq!(labels(&visible_sections(&policy, &session_with_role(1999))), vec!["Categories", "Products"]);
}

#[test]
fn writer_and_anonymous_see_nothing() {
    let policy = PolicyTable::storefront();
    assert!(visible_sections(&policy, &session_with_role(1996)).is_empty());
    assert!(visible_sections(&policy, &Session::anonymous()).is_empty());
}
