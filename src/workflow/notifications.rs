//! Dashboard notifications: the bell's unread preview and the full list.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use std::time::Duration;

use serde::Deserialize;

use super::WorkflowError;
use crate::api::resources::{FilterOp, SortOrder};
use crate::api::{ApiClient, ListPage, ListQuery, Resource};

/// Entries shown in the bell dropdown.
pub const UNREAD_PREVIEW_LIMIT: u32 = 5;
/// How often the bell refreshes its unread preview.
pub const UNREAD_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Newest unread notifications for the bell.
#[must_use]
pub fn unread_query() -> ListQuery {
    ListQuery::new()
        .filter("isRead", FilterOp::Eq, "false")
        .sort("createdAt", SortOrder::Desc)
        .limit(UNREAD_PREVIEW_LIMIT)
}

/// Every notification, newest first, with the user relation.
#[must_use]
pub fn all_query() -> ListQuery {
    ListQuery::new().sort("createdAt", SortOrder::Desc).populate("user")
}

/// # Errors
///
/// Any request failure.
pub async fn unread(api: &ApiClient) -> Result<Vec<Notification>, WorkflowError> {
    let page: ListPage<Notification> = api.list(Resource::Notifications, &unread_query()).await?;
    Ok(page.items)
}

/// # Errors
///
/// Any request failure.
pub async fn all(api: &ApiClient) -> Result<Vec<Notification>, WorkflowError> {
    let page: ListPage<Notification> = api.list(Resource::Notifications, &all_query()).await?;
    Ok(page.items)
}

/// # Errors
///
/// Any request failure.
pub async fn mark_read(api: &ApiClient, document_id: &str) -> Result<(), WorkflowError> {
    let _: serde_json::Value = api
        .update_entry(Resource::Notifications, document_id, &serde_json::json!({ "isRead": true }))
        .await?;
    Ok(())
}

/// # Errors
///
/// Any request failure.
pub async fn remove(api: &ApiClient, document_id: &str) -> Result<(), WorkflowError> {
    api.delete_entry(Resource::Notifications, document_id).await?;
    Ok(())
}

/// Flip the local copy after a successful mark-read, without refetching.
pub fn apply_read(items: &mut [Notification], document_id: &str) {
    if let Some(item) = items.iter_mut().find(|n| n.document_id == document_id) {
        item.is_read = true;
    }
}

#[must_use]
pub fn unread_count(items: &[Notification]) -> usize {
    items.iter().filter(|n| !n.is_read).count()
}
