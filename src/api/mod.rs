//! REST access to the headless CMS.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` is the one configured request pipeline (credential injection and
//! the 401 hook), `resources` layers the CMS collection conventions on top of
//! it, `uploads` covers the media library, `paths` names every endpoint and
//! `types` holds the wire shapes.

pub mod client;
pub mod error;
pub mod paths;
pub mod resources;
pub mod types;
pub mod uploads;

pub use client::ApiClient;
pub use error::ApiError;
pub use resources::{ListPage, ListQuery, Resource};
pub use uploads::{UploadFile, UploadTarget, UploadedFile};
