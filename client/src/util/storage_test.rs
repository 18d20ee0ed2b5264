use super::*;

#[test]
fn failed_write_is_reported() {
    assert!(written::<()>("clear", Ok(())));
    assert!(!written("clear", Err("QuotaExceededError")));
}

#[test]
fn native_store_stays_empty() {
    let store = BrowserStore;
    store.save("jwt");
    assert_eq!(store.load(), None);
    store.clear();
    assert_eq!(store.load(), None);
}
