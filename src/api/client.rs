//! The single configured request pipeline.
//!
//! DESIGN
//! ======
//! Every request reads the credential store right before it is sent, so a
//! login or logout elsewhere is picked up by the very next call. Responses
//! are inspected once: a 401 runs the unauthorized hook, any other
//! non-success status becomes [`ApiError::Status`].
//!
//! The pipeline deliberately has no retry, no queueing behind a token
//! refresh and no deduplication of identical in-flight requests.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::extract_error_message;
use crate::config::ApiConfig;
use crate::storage::CredentialStore;

/// Callback run for every 401 response, with the request path.
pub type UnauthorizedHook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
    credentials: Arc<dyn CredentialStore>,
    on_unauthorized: UnauthorizedHook,
}

impl ApiClient {
    /// Build a client over `config`, reading tokens from `credentials`.
    ///
    /// The unauthorized hook starts as a no-op; see
    /// [`ApiClient::with_unauthorized_hook`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: ApiConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs));
        let http = builder.build().map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            config: Arc::new(config),
            credentials,
            on_unauthorized: Arc::new(|_path: &str| {}),
        })
    }

    /// Replace the hook run when the backend answers 401.
    #[must_use]
    pub fn with_unauthorized_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_unauthorized = Arc::new(hook);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    // =========================================================================
    // VERBS
    // =========================================================================

    /// `GET path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Transport, non-success status, or body decode failures.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.dispatch(path, self.request(Method::GET, path)).await?;
        decode(response).await
    }

    /// `GET path?query` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Transport, non-success status, or body decode failures.
    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .dispatch(path, self.request(Method::GET, path).query(query))
            .await?;
        decode(response).await
    }

    /// `POST path` with a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Transport, non-success status, or body decode failures.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .dispatch(path, self.request(Method::POST, path).json(body))
            .await?;
        decode(response).await
    }

    /// `POST path` with a multipart form and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Transport, non-success status, or body decode failures.
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let response = self
            .dispatch(path, self.request(Method::POST, path).multipart(form))
            .await?;
        decode(response).await
    }

    /// `POST path` without a body, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Transport or non-success status.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(path, self.request(Method::POST, path)).await?;
        Ok(())
    }

    /// `PUT path` with a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Transport, non-success status, or body decode failures.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .dispatch(path, self.request(Method::PUT, path).json(body))
            .await?;
        decode(response).await
    }

    /// `DELETE path`, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Transport or non-success status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(path, self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    // =========================================================================
    // PIPELINE
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.config.endpoint(path));
        match self.credentials.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn dispatch(&self, path: &str, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!(path, "api responded 401");
            (self.on_unauthorized)(path);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status: status.as_u16(), message: extract_error_message(&body) });
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}
