//! Request pipeline errors.

/// Errors produced by [`super::ApiClient`] calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("http client build failed: {0}")]
    ClientBuild(String),

    /// The request never produced a response (DNS, connect, timeout, CORS).
    #[error("request failed: {0}")]
    Transport(String),

    /// The CMS answered with a non-success status.
    #[error("api responded {status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// A file could not be turned into a multipart part (bad mime type).
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Backend-provided message (`error.message`), if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Transport(_) => "E_API_TRANSPORT",
            Self::Status { status: 401, .. } => "E_UNAUTHENTICATED",
            Self::Status { status: 403, .. } => "E_FORBIDDEN",
            Self::Status { .. } => "E_API_STATUS",
            Self::Decode(_) => "E_API_DECODE",
            Self::InvalidUpload(_) => "E_INVALID_UPLOAD",
        }
    }

    /// Whether the same request could succeed later without user action.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
