//! CMS collection conventions: list/get/create/update/delete.
//!
//! DESIGN
//! ======
//! Lists are `GET <collection>?pagination[page]=..&filters[..]..`; single
//! entries are addressed by `documentId`; writes wrap their payload in
//! `{data: ...}`. The users collection is the odd one out and answers lists
//! with a bare JSON array, so list decoding accepts both shapes.

#[cfg(test)]
#[path = "resources_test.rs"]
mod resources_test;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::client::ApiClient;
use super::error::ApiError;
use super::paths;
use super::types::{Collection, DataEnvelope, Single};

// =============================================================================
// RESOURCE
// =============================================================================

/// Backend-managed collections the dashboard works with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Categories,
    Products,
    Customers,
    Orders,
    OrderItems,
    Purchases,
    PurchaseItems,
    Traders,
    Warehouses,
    Inventories,
    Notifications,
    /// Storefront sections (`featured-products`, menu pages).
    Pages,
}

impl Resource {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Users => paths::USERS,
            Self::Categories => paths::CATEGORIES,
            Self::Products => paths::PRODUCTS,
            Self::Customers => paths::CUSTOMERS,
            Self::Orders => paths::ORDERS,
            Self::OrderItems => paths::ORDER_ITEMS,
            Self::Purchases => paths::PURCHASES,
            Self::PurchaseItems => paths::PURCHASE_ITEMS,
            Self::Traders => paths::TRADERS,
            Self::Warehouses => paths::WAREHOUSES,
            Self::Inventories => paths::INVENTORIES,
            Self::Notifications => paths::NOTIFICATIONS,
            Self::Pages => paths::PAGES,
        }
    }

    /// Field the list screen's search box filters on.
    #[must_use]
    pub const fn search_field(self) -> &'static str {
        match self {
            Self::Users => "username",
            Self::Customers | Self::Traders | Self::Pages => "name",
            _ => "title",
        }
    }

    /// Path of one entry.
    #[must_use]
    pub fn entry_path(self, document_id: &str) -> String {
        format!("{}/{document_id}", self.path())
    }
}

// =============================================================================
// QUERY
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    Contains,
    /// Case-insensitive contains.
    ContainsI,
    Eq,
}

impl FilterOp {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "$contains",
            Self::ContainsI => "$containsi",
            Self::Eq => "$eq",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Filter {
    field: String,
    op: FilterOp,
    value: String,
}

/// Builder for list query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    page: Option<u32>,
    page_size: Option<u32>,
    limit: Option<u32>,
    filters: Vec<Filter>,
    sort: Vec<String>,
    populate: Vec<String>,
}

impl ListQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Offset-style cap, `pagination[limit]`.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add a filter. A blank value adds nothing, so an empty search box
    /// lists everything. Dotted fields (`pages.name`) filter on a relation.
    #[must_use]
    pub fn filter(mut self, field: &str, op: FilterOp, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() {
            self.filters.push(Filter { field: field.to_owned(), op, value: value.to_owned() });
        }
        self
    }

    #[must_use]
    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        let dir = match order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        self.sort.push(format!("{field}:{dir}"));
        self
    }

    /// Populate a relation; `products.images` also populates the nested
    /// relation.
    #[must_use]
    pub fn populate(mut self, relation: &str) -> Self {
        self.populate.push(relation.to_owned());
        self
    }

    #[must_use]
    pub fn populate_all(self) -> Self {
        self.populate("*")
    }

    /// Query pairs in CMS bracket notation.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("pagination[page]".to_owned(), page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("pagination[pageSize]".to_owned(), size.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("pagination[limit]".to_owned(), limit.to_string()));
        }
        for filter in &self.filters {
            let path: String = filter.field.split('.').map(|part| format!("[{part}]")).collect();
            pairs.push((format!("filters{path}[{}]", filter.op.as_str()), filter.value.clone()));
        }
        for sort in &self.sort {
            pairs.push(("sort".to_owned(), sort.clone()));
        }
        // Nested populates switch every relation to the object form.
        let nested = self.populate.iter().any(|relation| relation.contains('.'));
        for relation in &self.populate {
            match relation.split_once('.') {
                Some((outer, inner)) => pairs.push((format!("populate[{outer}][populate][{inner}]"), "true".to_owned())),
                None if nested => pairs.push((format!("populate[{relation}]"), "true".to_owned())),
                None => pairs.push(("populate".to_owned(), relation.clone())),
            }
        }
        pairs
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// One page of a collection.
#[derive(Clone, Debug, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Total matching entries across all pages.
    pub total: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Envelope(Collection<T>),
    Bare(Vec<T>),
}

impl<T> From<ListBody<T>> for ListPage<T> {
    fn from(body: ListBody<T>) -> Self {
        match body {
            ListBody::Envelope(collection) => {
                let total = collection
                    .meta
                    .pagination
                    .map_or(collection.data.len() as u64, |p| p.total);
                Self { items: collection.data, total }
            }
            ListBody::Bare(items) => Self { total: items.len() as u64, items },
        }
    }
}

// =============================================================================
// CRUD
// =============================================================================

impl ApiClient {
    /// List one page of `resource`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request pipeline.
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource, query: &ListQuery) -> Result<ListPage<T>, ApiError> {
        let body: ListBody<T> = self.get_json_with_query(resource.path(), &query.to_pairs()).await?;
        Ok(body.into())
    }

    /// Fetch one entry by document id.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request pipeline.
    pub async fn get_entry<T: DeserializeOwned>(
        &self,
        resource: Resource,
        document_id: &str,
        query: &ListQuery,
    ) -> Result<T, ApiError> {
        let body: Single<T> = self
            .get_json_with_query(&resource.entry_path(document_id), &query.to_pairs())
            .await?;
        Ok(body.data)
    }

    /// Create an entry from `data` and return the created entry.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request pipeline.
    pub async fn create_entry<D, T>(&self, resource: Resource, data: &D) -> Result<T, ApiError>
    where
        D: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body: Single<T> = self.post_json(resource.path(), &DataEnvelope { data }).await?;
        Ok(body.data)
    }

    /// Update an entry with the fields in `data`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request pipeline.
    pub async fn update_entry<D, T>(&self, resource: Resource, document_id: &str, data: &D) -> Result<T, ApiError>
    where
        D: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body: Single<T> = self
            .put_json(&resource.entry_path(document_id), &DataEnvelope { data })
            .await?;
        Ok(body.data)
    }

    /// Delete an entry.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request pipeline.
    pub async fn delete_entry(&self, resource: Resource, document_id: &str) -> Result<(), ApiError> {
        tracing::info!(resource = resource.path(), document_id, "deleting entry");
        self.delete(&resource.entry_path(document_id)).await
    }
}
