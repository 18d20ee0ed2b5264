//! Multi-step dashboard forms and storefront queries.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each workflow keeps the form's local state and knows which CMS calls to
//! make, in what order, when the user submits. Screens own a workflow value
//! and render from it; they never assemble request bodies themselves.

pub mod forms;
pub mod notifications;
pub mod order;
pub mod product;
pub mod storefront;

use crate::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("draft product has not been created yet")]
    NoDraft,
    #[error("created entry has no documentId")]
    MissingDocumentId,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WorkflowError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid(_) | Self::MissingField(_) => "E_INVALID_FORM",
            Self::NoDraft => "E_NO_DRAFT",
            Self::MissingDocumentId => "E_MISSING_DOCUMENT_ID",
            Self::Api(err) => err.error_code(),
        }
    }

    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Api(err) if err.retryable())
    }
}
