//! In-process mock of the CMS for async tests.
//!
//! Every request is recorded (method, path, query, `Authorization`, body).
//! Responses are scripted per `METHOD path`; a scripted sequence is consumed
//! front to back and its last entry repeats. Unscripted routes 404.
//! A route can also answer one bearer token differently, optionally after a
//! delay, to stage requests that overlap.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::storage::CredentialStore;

#[derive(Clone, Debug)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<serde_json::Value>,
    pub content_type: Option<String>,
    /// Body as text, lossy; for non-JSON bodies such as multipart forms.
    pub raw_body: String,
}

#[derive(Default)]
pub(crate) struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<HashMap<String, VecDeque<(u16, serde_json::Value)>>>,
    by_token: Mutex<HashMap<String, (Duration, u16, serde_json::Value)>>,
}

pub(crate) struct MockCms {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockCms {
    pub async fn spawn() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { base_url: format!("http://{addr}/api"), state }
    }

    pub fn client(&self, credentials: Arc<dyn CredentialStore>) -> ApiClient {
        ApiClient::new(ApiConfig::with_base_url(&self.base_url).unwrap(), credentials).unwrap()
    }

    /// Always answer `METHOD /api<path>` with `status` and `body`.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: serde_json::Value) {
        self.respond_seq(method, path, vec![(status, body)]);
    }

    /// Answer successive calls with successive entries; the last one repeats.
    pub fn respond_seq(&self, method: &str, path: &str, seq: Vec<(u16, serde_json::Value)>) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(route_key(method, &format!("/api{path}")), seq.into());
    }

    /// Answer requests carrying `Bearer <token>` with `status` and `body`
    /// after `delay`, ahead of any sequence scripted for the route.
    pub fn respond_for_token(
        &self,
        method: &str,
        path: &str,
        token: &str,
        delay: Duration,
        status: u16,
        body: serde_json::Value,
    ) {
        self.state
            .by_token
            .lock()
            .unwrap()
            .insert(token_key(method, &format!("/api{path}"), token), (delay, status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests that hit `/api<path>`, any method.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        let full = format!("/api{path}");
        self.requests().into_iter().filter(|r| r.path == full).collect()
    }
}

fn route_key(method: &str, path: &str) -> String {
    format!("{method} {path}")
}

fn token_key(method: &str, path: &str, token: &str) -> String {
    format!("{method} {path} {token}")
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    let path = uri.path().to_owned();
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_owned),
        authorization: authorization.clone(),
        body: serde_json::from_slice(&body).ok(),
        content_type: headers.get("content-type").and_then(|v| v.to_str().ok()).map(str::to_owned),
        raw_body: String::from_utf8_lossy(&body).into_owned(),
    });

    let token = authorization.as_deref().and_then(|a| a.strip_prefix("Bearer ")).unwrap_or_default();
    let scripted = state
        .by_token
        .lock()
        .unwrap()
        .get(&token_key(method.as_str(), &path, token))
        .cloned();
    if let Some((delay, status, body)) = scripted {
        tokio::time::sleep(delay).await;
        return (StatusCode::from_u16(status).unwrap(), Json(body));
    }

    let mut responses = state.responses.lock().unwrap();
    let Some(seq) = responses.get_mut(&route_key(method.as_str(), &path)) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "data": null, "error": { "status": 404, "message": "Not Found" } })),
        );
    };
    let (status, body) = if seq.len() > 1 {
        seq.pop_front().unwrap()
    } else {
        seq.front().cloned().unwrap()
    };
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

/// Strapi-shaped user payload with the given role id.
pub(crate) fn user_json(username: &str, role_id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": 42,
        "username": username,
        "email": format!("{username}@example.com"),
        "role": { "id": role_id, "name": format!("role-{role_id}") }
    })
}
