//! The session store: bootstrap, login, registration, OAuth callback, logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! One store is built at application start and handed to the UI through
//! context. It owns no token of its own; it reads and writes the credential
//! store the [`ApiClient`] was built over, so the request pipeline and the
//! session always agree about who is logged in.
//!
//! LIFECYCLE
//! =========
//! `Resolving` → (`bootstrap`, exactly once) → `Authenticated` | `Anonymous`.
//! Login, registration and the OAuth callback move to `Authenticated`;
//! logout moves to `Anonymous`. Every transition is broadcast on a
//! `tokio::sync::watch` channel.
//!
//! ERROR HANDLING
//! ==============
//! Bootstrap never fails: any error clears the token and settles anonymous.
//! The [`BootstrapOutcome`] keeps "backend rejected the token" apart from
//! "backend unreachable" for logging only.
//!
//! Login, registration, the OAuth callback and logout bump a transition
//! generation before touching the token. A bootstrap whose identity request
//! straddles such a bump discards its result, so a late answer for the old
//! token can never undo a newer login or logout.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;

use super::state::Session;
use crate::api::types::{AuthResponse, Identity, USERNAME_SEPARATOR};
use crate::api::{ApiClient, ApiError, paths};
use crate::guard::{DASHBOARD_ROUTE, LANDING_ROUTE, Redirect};
use crate::storage::CredentialStore;

/// Minimum password length accepted by the sign-up form.
pub const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("password must be at least 8 characters")]
    PasswordTooShort,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("invalid identifier or password")]
    InvalidCredentials,
    #[error("oauth callback is missing access_token")]
    MissingAccessToken,
    #[error("backend returned an empty token")]
    EmptyToken,
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) | Self::PasswordTooShort | Self::PasswordMismatch => "E_INVALID_FORM",
            Self::InvalidCredentials => "E_INVALID_CREDENTIALS",
            Self::MissingAccessToken => "E_OAUTH_CALLBACK",
            Self::EmptyToken => "E_EMPTY_TOKEN",
            Self::Rejected(_) => "E_REJECTED",
            Self::Api(err) => err.error_code(),
        }
    }

    /// Form errors the user fixes by editing input, as opposed to backend
    /// or transport failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField(_) | Self::PasswordTooShort | Self::PasswordMismatch)
    }
}

/// How bootstrap settled. The UI treats every non-authenticated outcome as
/// a silent logout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Bootstrap already ran for this store; nothing was done.
    AlreadyResolved,
    /// No stored token; no request was sent.
    NoCredential,
    Authenticated,
    /// The backend answered the identity request with an error status.
    Rejected { status: u16 },
    /// Transport or decode failure.
    Unreachable { reason: String },
    /// A login or logout happened while the identity request was in flight;
    /// its answer was dropped.
    Superseded,
}

// =============================================================================
// SIGN-UP FORM
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub handle: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// Check the form and build the stored username
    /// (`"<handle>:::<first> <last>"`).
    ///
    /// # Errors
    ///
    /// The first failing rule: blank field, short password, mismatch.
    pub fn validate(&self) -> Result<String, AuthError> {
        let fields = [
            ("username", &self.handle),
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("password", &self.password),
        ];
        if let Some((name, _)) = fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AuthError::MissingField(name));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(format!(
            "{}{USERNAME_SEPARATOR}{} {}",
            self.handle.trim(),
            self.first_name.trim(),
            self.last_name.trim()
        ))
    }
}

// =============================================================================
// STORE
// =============================================================================

pub struct SessionStore {
    api: ApiClient,
    state: watch::Sender<Session>,
    bootstrapped: AtomicBool,
    /// Bumped by every user-driven transition.
    generation: AtomicU64,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(Session::resolving());
        Self { api, state, bootstrapped: AtomicBool::new(false), generation: AtomicU64::new(0) }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn current_session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every transition, starting from the current one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    fn credentials(&self) -> &Arc<dyn CredentialStore> {
        self.api.credentials()
    }

    fn supersede(&self) {
        self.bootstrapped.store(true, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn set(&self, session: Session) {
        tracing::debug!(status = ?session.status(), "session transition");
        self.state.send_replace(session);
    }

    /// Resolve the session from the persisted token. Runs once per store.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return BootstrapOutcome::AlreadyResolved;
        }

        let Some(token) = self.credentials().load() else {
            self.set(Session::anonymous());
            tracing::info!("session bootstrap: no stored credential");
            return BootstrapOutcome::NoCredential;
        };

        let generation = self.generation.load(Ordering::SeqCst);
        let result = self.fetch_identity().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::info!("session bootstrap superseded by a newer transition");
            return BootstrapOutcome::Superseded;
        }

        match result {
            Ok(identity) => {
                tracing::info!(user_id = identity.id, role = ?identity.role_id(), "session bootstrap: authenticated");
                self.set(Session::authenticated(identity));
                BootstrapOutcome::Authenticated
            }
            Err(err) => {
                if self.credentials().load().as_deref() == Some(token.as_str()) {
                    self.credentials().clear();
                }
                self.set(Session::anonymous());
                let outcome = match err.status() {
                    Some(status) => BootstrapOutcome::Rejected { status },
                    None => BootstrapOutcome::Unreachable { reason: err.to_string() },
                };
                tracing::warn!(error = %err, code = err.error_code(), "session bootstrap failed; continuing anonymous");
                outcome
            }
        }
    }

    /// Clear the session and token. Never fails; safe to call repeatedly.
    pub async fn logout(&self) -> Redirect {
        self.supersede();
        if self.credentials().load().is_some() {
            if let Err(err) = self.api.post_empty(paths::LOGOUT).await {
                tracing::debug!(error = %err, "logout request failed; clearing locally");
            }
        }
        self.credentials().clear();
        self.set(Session::anonymous());
        tracing::info!("session logged out");
        Redirect::replace(LANDING_ROUTE)
    }

    /// Exchange credentials for a token and resolve the identity.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for 400/401, form errors for blank
    /// input, [`AuthError::Api`] otherwise.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Redirect, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AuthError::MissingField("identifier"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let body = serde_json::json!({ "identifier": identifier, "password": password });
        let auth: AuthResponse = self
            .api
            .post_json(paths::LOGIN, &body)
            .await
            .map_err(|err| match err.status() {
                Some(400 | 401) => AuthError::InvalidCredentials,
                _ => AuthError::Api(err),
            })?;

        self.establish(&auth.jwt).await?;
        Ok(Redirect::push(DASHBOARD_ROUTE))
    }

    /// Create an account, then log it in.
    ///
    /// # Errors
    ///
    /// Form validation errors, [`AuthError::Rejected`] with the backend's
    /// message, or [`AuthError::Api`].
    pub async fn register(&self, form: &SignUpForm) -> Result<Redirect, AuthError> {
        let username = form.validate()?;
        let body = serde_json::json!({
            "username": username,
            "email": form.email.trim(),
            "password": form.password,
        });
        let auth: AuthResponse = self
            .api
            .post_json(paths::REGISTER, &body)
            .await
            .map_err(|err| match err.message() {
                Some(message) => AuthError::Rejected(message.to_owned()),
                None => AuthError::Api(err),
            })?;

        self.establish(&auth.jwt).await?;
        Ok(Redirect::push(LANDING_ROUTE))
    }

    /// Finish the Google redirect: `query` is the raw query string the
    /// provider sent back (with or without the leading `?`).
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingAccessToken`] when the query has no
    /// `access_token`; backend failures as [`AuthError::Api`]. Callers send
    /// the user to the login page on any error.
    pub async fn complete_oauth_callback(&self, query: &str) -> Result<Redirect, AuthError> {
        let query = query.trim_start_matches('?');
        let has_token = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == "access_token" && !value.is_empty());
        if !has_token {
            return Err(AuthError::MissingAccessToken);
        }

        let auth: AuthResponse = self
            .api
            .get_json(&format!("{}?{query}", paths::GOOGLE_CALLBACK))
            .await?;
        self.establish(&auth.jwt).await?;
        Ok(Redirect::push(DASHBOARD_ROUTE))
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    async fn fetch_identity(&self) -> Result<Identity, ApiError> {
        self.api
            .get_json_with_query(paths::CURRENT_USER, &[("populate", "role")])
            .await
    }

    /// Persist `token`, resolve the identity and publish it. On failure the
    /// token is dropped again and the session settles anonymous.
    async fn establish(&self, token: &str) -> Result<(), AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::EmptyToken);
        }
        self.supersede();
        self.credentials().save(token);

        match self.fetch_identity().await {
            Ok(identity) => {
                tracing::info!(user_id = identity.id, "session authenticated");
                self.set(Session::authenticated(identity));
                Ok(())
            }
            Err(err) => {
                self.credentials().clear();
                self.set(Session::anonymous());
                Err(err.into())
            }
        }
    }
}
