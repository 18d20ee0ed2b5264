use storefront::api::types::{Identity, Role};

use super::*;

fn identity(username: &str, role: Option<i64>) -> Identity {
    Identity {
        id: 7,
        username: username.to_owned(),
        email: "user@example.com".to_owned(),
        role: role.map(|id| Role { id: Some(RoleId(id)), name: String::new() }),
    }
}

#[test]
fn display_name_prefers_full_name_part() {
    let session = Session::authenticated(identity("mona:::Mona Adel", Some(1)));
    assert_eq!(display_name(&session).as_deref(), Some("Mona Adel"));
}

#[test]
fn display_name_absent_until_authenticated() {
    assert_eq!(display_name(&Session::resolving()), None);
    assert_eq!(display_name(&Session::anonymous()), None);
}

#[test]
fn role_comes_from_identity() {
    assert_eq!(role_of(&Session::authenticated(identity("a", Some(1996)))), Some(RoleId(1996)));
    assert_eq!(role_of(&Session::authenticated(identity("a", None))), None);
    assert_eq!(role_of(&Session::anonymous()), None);
}

// =============================================================================
// NAVIGATION AFTER TRANSITIONS
// =============================================================================

/// Drive a future that never waits on I/O to completion.
fn ready<F: std::future::Future>(future: F) -> F::Output {
    let mut future = std::pin::pin!(future);
    let mut cx = std::task::Context::from_waker(std::task::Waker::noop());
    match future.as_mut().poll(&mut cx) {
        std::task::Poll::Ready(output) => output,
        std::task::Poll::Pending => panic!("future was expected to complete without waiting"),
    }
}

fn context() -> SessionContext {
    let api = ApiClient::new(
        storefront::config::ApiConfig::default(),
        Arc::new(storefront::storage::MemoryStore::new()),
    )
    .unwrap();
    SessionContext::new(Arc::new(SessionStore::new(api)))
}

#[test]
fn follow_updates_mirror_before_navigating() {
    let ctx = context();
    assert_eq!(ctx.session.get_untracked(), Session::resolving());

    let redirect = ready(ctx.store().logout());
    let seen = std::cell::RefCell::new(Vec::new());
    let navigate = |to: &str, _: NavigateOptions| seen.borrow_mut().push((to.to_owned(), ctx.session.get_untracked()));
    ctx.follow(&navigate, redirect);

    assert_eq!(seen.into_inner(), vec![("/".to_owned(), Session::anonymous())]);
}

#[test]
fn sync_leaves_an_up_to_date_mirror_alone() {
    let ctx = context();
    ctx.sync();
    assert_eq!(ctx.session.get_untracked(), Session::resolving());
}
