//! Product creation: draft first, publish later.
//!
//! DESIGN
//! ======
//! Picking the first category creates a throwaway draft entry so the form has
//! a document id to attach stock to. Publishing turns the draft into the real
//! product and then creates one inventory row per warehouse with stock.
//!
//! The wizard itself is plain state; the two network steps are separate
//! async functions so a UI can hold the state in a signal and never keep a
//! mutable borrow across an await.
//!
//! Editing an existing product is [`ProductEdit`]: details, categories and
//! images are saved together, while each warehouse's stock is written on its
//! own (update the inventory row when one exists, create it otherwise) and
//! the product's inventories are re-read afterwards. The slug is fixed when
//! the product is published; edits never rewrite it.

#[cfg(test)]
#[path = "product_test.rs"]
mod product_test;

use std::collections::BTreeMap;

use super::WorkflowError;
use crate::api::types::{EntryRef, connect};
use crate::api::{ApiClient, ListQuery, Resource};

pub const DRAFT_TITLE: &str = "Draft Product";

/// Editable product fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductDetails {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub barcode: String,
    pub brand: String,
    pub show_on_website: bool,
}

impl Default for ProductDetails {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: 0.0,
            barcode: String::new(),
            brand: String::new(),
            show_on_website: true,
        }
    }
}

impl ProductDetails {
    /// Prefill from a fetched product entry; missing fields keep defaults.
    #[must_use]
    pub fn from_entry(entry: &serde_json::Value) -> Self {
        let text = |key: &str| entry[key].as_str().unwrap_or_default().to_owned();
        Self {
            title: text("title"),
            description: text("description"),
            price: entry["price"].as_f64().unwrap_or(0.0),
            barcode: text("barcode"),
            brand: text("brand"),
            show_on_website: entry["showOnWebsite"].as_bool().unwrap_or(true),
        }
    }

    fn payload(&self, title: &str, categories: &[i64], images: &[i64]) -> serde_json::Map<String, serde_json::Value> {
        let mut body = serde_json::Map::new();
        body.insert("title".to_owned(), title.into());
        body.insert("description".to_owned(), self.description.clone().into());
        body.insert("price".to_owned(), self.price.into());
        body.insert("barcode".to_owned(), self.barcode.clone().into());
        body.insert("brand".to_owned(), self.brand.clone().into());
        body.insert("showOnWebsite".to_owned(), self.show_on_website.into());
        body.insert("categories".to_owned(), serde_json::json!(categories));
        body.insert("images".to_owned(), serde_json::json!(images));
        body
    }
}

/// Checks shared by publishing and saving; returns the trimmed title.
fn checked_title<'a>(details: &'a ProductDetails, categories: &[i64]) -> Result<&'a str, WorkflowError> {
    if categories.is_empty() {
        return Err(WorkflowError::Invalid("select at least one category"));
    }
    let title = details.title.trim();
    if title.is_empty() {
        return Err(WorkflowError::Invalid("title is required"));
    }
    Ok(title)
}

/// Ids of a populated to-many relation (`categories`, `images`).
fn relation_ids(entry: &serde_json::Value, relation: &str) -> Vec<i64> {
    entry[relation]
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DraftState {
    #[default]
    None,
    /// Creation request in flight.
    Pending,
    Ready(String),
}

/// Result of picking a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryPick {
    AlreadySelected,
    Added,
    /// Added, and the caller must now create the draft with this category.
    AddedNeedsDraft(i64),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductWizard {
    pub details: ProductDetails,
    categories: Vec<i64>,
    draft: DraftState,
    stock: BTreeMap<String, u32>,
    images: Vec<i64>,
}

impl ProductWizard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn categories(&self) -> &[i64] {
        &self.categories
    }

    #[must_use]
    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    #[must_use]
    pub fn draft_id(&self) -> Option<&str> {
        match &self.draft {
            DraftState::Ready(id) => Some(id),
            _ => None,
        }
    }

    /// Stock entered for `warehouse` (a warehouse document id).
    #[must_use]
    pub fn stock(&self, warehouse: &str) -> u32 {
        self.stock.get(warehouse).copied().unwrap_or(0)
    }

    pub fn select_category(&mut self, id: i64) -> CategoryPick {
        if self.categories.contains(&id) {
            return CategoryPick::AlreadySelected;
        }
        self.categories.push(id);
        if self.draft == DraftState::None {
            self.draft = DraftState::Pending;
            CategoryPick::AddedNeedsDraft(id)
        } else {
            CategoryPick::Added
        }
    }

    pub fn remove_category(&mut self, id: i64) {
        self.categories.retain(|c| *c != id);
    }

    /// Uploaded image ids, in upload order.
    #[must_use]
    pub fn images(&self) -> &[i64] {
        &self.images
    }

    pub fn add_image(&mut self, id: i64) {
        if !self.images.contains(&id) {
            self.images.push(id);
        }
    }

    pub fn remove_image(&mut self, id: i64) {
        self.images.retain(|i| *i != id);
    }

    /// Replace the image list, e.g. with an uploader's current ids.
    pub fn set_images(&mut self, ids: &[i64]) {
        ids.clone_into(&mut self.images);
    }

    pub fn draft_created(&mut self, document_id: String) {
        self.draft = DraftState::Ready(document_id);
    }

    /// Let the next category pick try again.
    pub fn draft_failed(&mut self) {
        if self.draft == DraftState::Pending {
            self.draft = DraftState::None;
        }
    }

    /// Add `delta` to a warehouse's stock, never below zero. Ignored until
    /// the draft exists.
    pub fn adjust_stock(&mut self, warehouse: &str, delta: i64) {
        if self.draft_id().is_none() {
            return;
        }
        let current = i64::from(self.stock(warehouse));
        let next = u32::try_from((current + delta).max(0)).unwrap_or(u32::MAX);
        self.stock.insert(warehouse.to_owned(), next);
    }

    #[must_use]
    pub fn can_publish(&self) -> bool {
        !self.details.title.trim().is_empty() && self.draft_id().is_some() && !self.categories.is_empty()
    }

    /// Publish the draft, then create inventory rows for positive stock.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Invalid`] without a category or title,
    /// [`WorkflowError::NoDraft`] before the draft exists, else the first
    /// failing request.
    pub async fn finalize(&self, api: &ApiClient) -> Result<(), WorkflowError> {
        if self.categories.is_empty() {
            return Err(WorkflowError::Invalid("select at least one category"));
        }
        let Some(document_id) = self.draft_id() else {
            return Err(WorkflowError::NoDraft);
        };
        let title = checked_title(&self.details, &self.categories)?;

        let mut body = self.details.payload(title, &self.categories, &self.images);
        body.insert("slug".to_owned(), slugify(title).into());
        body.insert("productStatus".to_owned(), "published".into());
        body.insert("isTemporary".to_owned(), false.into());
        let _: serde_json::Value = api.update_entry(Resource::Products, document_id, &body).await?;

        for (warehouse, quantity) in self.stock.iter().filter(|(_, qty)| **qty > 0) {
            let _: serde_json::Value = api
                .create_entry(
                    Resource::Inventories,
                    &serde_json::json!({
                        "quantity": quantity,
                        "product": connect([document_id]),
                        "warehouse": warehouse,
                    }),
                )
                .await?;
        }
        tracing::info!(document_id, categories = self.categories.len(), "product published");
        Ok(())
    }
}

// =============================================================================
// EDITING
// =============================================================================

/// One warehouse's stock for an existing product.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StockLevel {
    /// Inventory row document id; `None` until the warehouse has a row.
    pub inventory: Option<String>,
    pub quantity: u32,
}

/// Stock per warehouse document id.
pub type StockLevels = BTreeMap<String, StockLevel>;

/// Read stock levels from a product entry with `inventories.warehouse`
/// populated. Rows without a warehouse are skipped.
#[must_use]
pub fn stock_levels(entry: &serde_json::Value) -> StockLevels {
    let mut levels = StockLevels::new();
    for row in entry["inventories"].as_array().into_iter().flatten() {
        let Some(warehouse) = row["warehouse"]["documentId"].as_str() else {
            continue;
        };
        let quantity = row["quantity"].as_u64().map_or(0, |q| u32::try_from(q).unwrap_or(u32::MAX));
        levels.insert(
            warehouse.to_owned(),
            StockLevel { inventory: row["documentId"].as_str().map(str::to_owned), quantity },
        );
    }
    levels
}

/// Edit form state for an existing product.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductEdit {
    pub details: ProductDetails,
    /// Numeric entry id; media uploads attach to it.
    pub entry_id: Option<i64>,
    categories: Vec<i64>,
    images: Vec<i64>,
    stock: StockLevels,
}

impl ProductEdit {
    /// Query for the edit screen: categories, images and stock per warehouse.
    #[must_use]
    pub fn query() -> ListQuery {
        ListQuery::new().populate("categories").populate("images").populate("inventories.warehouse")
    }

    /// Prefill from a product fetched with [`ProductEdit::query`].
    #[must_use]
    pub fn from_entry(entry: &serde_json::Value) -> Self {
        Self {
            details: ProductDetails::from_entry(entry),
            entry_id: entry["id"].as_i64(),
            categories: relation_ids(entry, "categories"),
            images: relation_ids(entry, "images"),
            stock: stock_levels(entry),
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[i64] {
        &self.categories
    }

    /// Returns whether the category was newly added.
    pub fn select_category(&mut self, id: i64) -> bool {
        if self.categories.contains(&id) {
            return false;
        }
        self.categories.push(id);
        true
    }

    pub fn remove_category(&mut self, id: i64) {
        self.categories.retain(|c| *c != id);
    }

    #[must_use]
    pub fn images(&self) -> &[i64] {
        &self.images
    }

    pub fn add_image(&mut self, id: i64) {
        if !self.images.contains(&id) {
            self.images.push(id);
        }
    }

    pub fn remove_image(&mut self, id: i64) {
        self.images.retain(|i| *i != id);
    }

    /// Replace the image list, e.g. with an uploader's current ids.
    pub fn set_images(&mut self, ids: &[i64]) {
        ids.clone_into(&mut self.images);
    }

    #[must_use]
    pub fn stock(&self, warehouse: &str) -> StockLevel {
        self.stock.get(warehouse).cloned().unwrap_or_default()
    }

    pub fn replace_stock(&mut self, stock: StockLevels) {
        self.stock = stock;
    }
}

/// Save an edited product's details, categories and images. The slug is
/// left untouched.
///
/// # Errors
///
/// [`WorkflowError::Invalid`] without a category or title, else the
/// request failure.
pub async fn update_product(api: &ApiClient, document_id: &str, edit: &ProductEdit) -> Result<(), WorkflowError> {
    let title = checked_title(&edit.details, &edit.categories)?;
    let body = edit.details.payload(title, &edit.categories, &edit.images);
    let _: serde_json::Value = api.update_entry(Resource::Products, document_id, &body).await?;
    tracing::info!(document_id, categories = edit.categories.len(), "product updated");
    Ok(())
}

/// Set one warehouse's stock for `product`, then re-read the product's
/// stock levels.
///
/// # Errors
///
/// Any request failure.
pub async fn set_stock(
    api: &ApiClient,
    product: &str,
    warehouse: &str,
    current: &StockLevel,
    quantity: u32,
) -> Result<StockLevels, WorkflowError> {
    if let Some(inventory) = current.inventory.as_deref() {
        let _: serde_json::Value = api
            .update_entry(Resource::Inventories, inventory, &serde_json::json!({ "quantity": quantity }))
            .await?;
    } else {
        let _: EntryRef = api
            .create_entry(
                Resource::Inventories,
                &serde_json::json!({
                    "quantity": quantity,
                    "product": connect([product]),
                    "warehouse": warehouse,
                }),
            )
            .await?;
    }
    tracing::info!(product, warehouse, quantity, "stock updated");

    let refreshed: serde_json::Value = api
        .get_entry(Resource::Products, product, &ListQuery::new().populate("inventories.warehouse"))
        .await?;
    Ok(stock_levels(&refreshed))
}

/// Create the placeholder entry for a new product. `now_millis` makes the
/// temporary slug unique.
///
/// # Errors
///
/// Request failures, or a created entry without a document id.
pub async fn create_draft(api: &ApiClient, category: i64, now_millis: u64) -> Result<String, WorkflowError> {
    let created: EntryRef = api
        .create_entry(
            Resource::Products,
            &serde_json::json!({
                "title": DRAFT_TITLE,
                "categories": [category],
                "description": "Pending...",
                "price": 0,
                "slug": format!("draft-{now_millis}"),
                "productStatus": "draft",
                "isTemporary": true,
            }),
        )
        .await?;
    let document_id = created.document_id.ok_or(WorkflowError::MissingDocumentId)?;
    tracing::debug!(%document_id, "draft product created");
    Ok(document_id)
}

/// URL slug: whitespace runs become `-`, letters are lower-cased.
#[must_use]
pub fn slugify(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase()
}
