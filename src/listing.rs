//! List-screen plumbing: fetch scoping, pagination state, date display.
//!
//! DESIGN
//! ======
//! A [`FetchScope`] lives as long as the screen that owns it. Every fetch
//! (and every debounced search keystroke) takes a ticket first; a result is
//! committed only while its ticket is the newest one and the scope has not
//! been closed. That covers both stale responses racing a newer query and
//! responses arriving after the screen unmounted.
//!
//! The users collection ignores pagination and answers with every user as
//! a bare array, so [`load_page`] fetches it whole and filters and slices
//! it locally. Every other collection is paged by the CMS.

#[cfg(test)]
#[path = "listing_test.rs"]
mod listing_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::api::resources::FilterOp;
use crate::api::{ApiClient, ApiError, ListPage, ListQuery, Resource};

/// Quiet period before a non-empty search box triggers a fetch.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_LIMIT: u32 = 5;
/// Page sizes offered by list screens.
pub const LIMIT_OPTIONS: [u32; 2] = [5, 10];

// =============================================================================
// FETCH SCOPE
// =============================================================================

/// Proof that a fetch was started; compare with [`FetchScope::is_current`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Default)]
struct ScopeInner {
    generation: AtomicU64,
    closed: AtomicBool,
}

/// Cancellation scope for one screen's fetches. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct FetchScope {
    inner: Arc<ScopeInner>,
}

impl FetchScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch, superseding every earlier ticket.
    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        !self.is_closed() && self.inner.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Run `commit` with `value` only if `ticket` is still current.
    /// Returns whether it ran.
    pub fn commit<T>(&self, ticket: FetchTicket, value: T, commit: impl FnOnce(T)) -> bool {
        if self.is_current(ticket) {
            commit(value);
            true
        } else {
            tracing::trace!(ticket = ticket.0, "dropping stale fetch result");
            false
        }
    }

    /// Invalidate every outstanding ticket; call on unmount.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

/// Delay before searching for `query`: immediate when the box is cleared.
#[must_use]
pub fn search_debounce(query: &str) -> Duration {
    if query.trim().is_empty() { Duration::ZERO } else { SEARCH_DEBOUNCE }
}

// =============================================================================
// PAGE STATE
// =============================================================================

/// Page, page size and search text of a list screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageState {
    page: u32,
    limit: u32,
    search: String,
}

impl Default for PageState {
    fn default() -> Self {
        Self { page: 1, limit: DEFAULT_LIMIT, search: String::new() }
    }
}

impl PageState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Changing the page size starts over at page 1.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
        self.page = 1;
    }

    /// Changing the search text starts over at page 1.
    pub fn set_search(&mut self, search: &str) {
        if self.search != search {
            search.clone_into(&mut self.search);
            self.page = 1;
        }
    }

    /// After a delete the list is reloaded from the first page, unfiltered.
    pub fn after_delete(&mut self) {
        self.page = 1;
        self.search.clear();
    }

    /// List query for `resource` reflecting this state.
    #[must_use]
    pub fn query(&self, resource: Resource) -> ListQuery {
        ListQuery::new()
            .page(self.page)
            .page_size(self.limit)
            .filter(resource.search_field(), FilterOp::Contains, &self.search)
    }

    #[must_use]
    pub fn page_count(&self, total: u64) -> u32 {
        page_count(total, self.limit)
    }

    /// This state's page of an already-fetched collection. Entries whose
    /// `field` does not contain the search text (case-insensitively) are
    /// skipped; `total` counts the matches.
    #[must_use]
    pub fn slice(&self, items: Vec<Value>, field: &str) -> ListPage<Value> {
        let needle = self.search.trim().to_lowercase();
        let matching: Vec<Value> = items
            .into_iter()
            .filter(|item| needle.is_empty() || item[field].as_str().is_some_and(|v| v.to_lowercase().contains(&needle)))
            .collect();
        let total = matching.len() as u64;
        let skip = (self.page as usize - 1).saturating_mul(self.limit as usize);
        let items = matching.into_iter().skip(skip).take(self.limit as usize).collect();
        ListPage { items, total }
    }
}

/// Fetch the page `state` selects from `resource`, relations populated.
///
/// # Errors
///
/// Any [`ApiError`] from the request pipeline.
pub async fn load_page(api: &ApiClient, resource: Resource, state: &PageState) -> Result<ListPage<Value>, ApiError> {
    if resource == Resource::Users {
        let everyone: ListPage<Value> = api.list(resource, &ListQuery::new().populate("role")).await?;
        return Ok(state.slice(everyone.items, resource.search_field()));
    }
    api.list(resource, &state.query(resource).populate_all()).await
}

/// Number of pages for `total` entries; never less than 1.
#[must_use]
pub fn page_count(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(per_page)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

// =============================================================================
// DATES
// =============================================================================

/// `YYYY-MM-DD` for an ISO-8601 timestamp (or a bare date). The date is
/// taken in the timestamp's own offset. `None` when unparseable.
#[must_use]
pub fn format_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let day = format_description!("[year]-[month]-[day]");
    let date = match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(timestamp) => timestamp.date(),
        Err(_) => time::Date::parse(raw, day).ok()?,
    };
    date.format(day).ok()
}
