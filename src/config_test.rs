use super::*;

#[test]
fn default_points_at_hosted_cms() {
    let config = ApiConfig::default();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.connect_timeout_secs, 10);
}

#[test]
fn with_base_url_trims_trailing_slashes() {
    let config = ApiConfig::with_base_url(" http://localhost:1337/api// ").unwrap();
    assert_eq!(config.base_url, "http://localhost:1337/api");
}

#[test]
fn with_base_url_rejects_missing_scheme() {
    assert_eq!(
        ApiConfig::with_base_url("localhost:1337/api"),
        Err(ConfigError::InvalidBaseUrl("localhost:1337/api".into()))
    );
}

#[test]
fn with_base_url_rejects_blank() {
    assert!(ApiConfig::with_base_url("   ").is_err());
    assert!(ApiConfig::with_base_url("https://").is_err());
}

#[test]
fn endpoint_joins_with_single_slash() {
    let config = ApiConfig::with_base_url("http://cms.test/api").unwrap();
    assert_eq!(config.endpoint("/users/me"), "http://cms.test/api/users/me");
    assert_eq!(config.endpoint("latest-sale"), "http://cms.test/api/latest-sale");
}

// =============================================================================
// from_env: a single test owns the STOREFRONT_* vars.
// =============================================================================

#[test]
fn from_env_reads_overrides_and_falls_back_on_garbage() {
    unsafe {
        std::env::set_var("STOREFRONT_API_BASE_URL", "https://cms.example.com/api/");
        std::env::set_var("STOREFRONT_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("STOREFRONT_CONNECT_TIMEOUT_SECS", "soon");
    }
    let config = ApiConfig::from_env().unwrap();
    assert_eq!(config.base_url, "https://cms.example.com/api");
    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);

    unsafe { std::env::set_var("STOREFRONT_API_BASE_URL", "ftp://nope") };
    assert!(ApiConfig::from_env().is_err());

    unsafe {
        std::env::remove_var("STOREFRONT_API_BASE_URL");
        std::env::remove_var("STOREFRONT_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("STOREFRONT_CONNECT_TIMEOUT_SECS");
    }
    assert_eq!(ApiConfig::from_env().unwrap(), ApiConfig::default());
}
