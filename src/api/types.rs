//! Wire shapes exchanged with the CMS.
//!
//! DESIGN
//! ======
//! Resource schemas belong to the backend, so collection entries stay
//! `serde_json::Value` unless a screen needs typed fields. Only the shapes the
//! session core depends on (user, role, auth response, list envelope) are
//! typed here.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Separator the sign-up form puts between the login handle and the full name.
pub const USERNAME_SEPARATOR: &str = ":::";

// =============================================================================
// IDENTITY
// =============================================================================

/// Numeric role identifier compared against route allow-lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub i64);

/// Role descriptor attached to the current user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// `None` when the backend sent an id that is not a number; such a role
    /// never matches any allow-list.
    #[serde(default, deserialize_with = "deserialize_role_id")]
    pub id: Option<RoleId>,
    #[serde(default)]
    pub name: String,
}

/// The authenticated user as returned by `GET /users/me?populate=role`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl Identity {
    #[must_use]
    pub fn role_id(&self) -> Option<RoleId> {
        self.role.as_ref().and_then(|role| role.id)
    }

    /// Human name: the part after `:::` for accounts created by the sign-up
    /// form, otherwise the raw username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.username.split_once(USERNAME_SEPARATOR) {
            Some((_, name)) if !name.trim().is_empty() => name.trim(),
            _ => &self.username,
        }
    }

    /// Login handle: the part before `:::`, or the whole username.
    #[must_use]
    pub fn handle(&self) -> &str {
        self.username
            .split_once(USERNAME_SEPARATOR)
            .map_or(self.username.as_str(), |(handle, _)| handle)
    }
}

fn deserialize_role_id<'de, D>(deserializer: D) -> Result<Option<RoleId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(number) => number
            .as_i64()
            .map(|id| Some(RoleId(id)))
            .ok_or_else(|| D::Error::custom("expected integer role id")),
        serde_json::Value::String(raw) => Ok(raw.trim().parse::<i64>().ok().map(RoleId)),
        _ => Err(D::Error::custom("expected number or string role id")),
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// Body of login, register and OAuth callback responses.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub jwt: String,
}

// =============================================================================
// COLLECTION ENVELOPES
// =============================================================================

/// `meta.pagination` of a list response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
}

/// `{data: [...], meta: {...}}` list body.
#[derive(Clone, Debug, Deserialize)]
pub struct Collection<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Meta,
}

/// `{data: {...}}` single-entry body.
#[derive(Clone, Debug, Deserialize)]
pub struct Single<T> {
    pub data: T,
}

/// `{data: ...}` request body for create/update calls.
#[derive(Clone, Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Identifiers of a freshly created or fetched entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct EntryRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "documentId")]
    pub document_id: Option<String>,
}

/// Relation payload connecting entries by document id.
#[must_use]
pub fn connect<I, S>(document_ids: I) -> serde_json::Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let refs: Vec<serde_json::Value> = document_ids
        .into_iter()
        .map(|id| serde_json::json!({ "documentId": id.as_ref() }))
        .collect();
    serde_json::json!({ "connect": refs })
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Pull `error.message` out of a CMS error body.
#[must_use]
pub fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .filter(|m| !m.trim().is_empty())
}
