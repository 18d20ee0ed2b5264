//! Order and purchase entry: pick the counterparty, add product lines, submit.
//!
//! Both forms share one draft. A sale goes to a customer and needs a
//! recipient; a purchase comes from a trader. Submission creates one line
//! item per line, in line order, then the header entry connected to the
//! counterparty and every created item. A failure part-way leaves the
//! already-created items behind; the CMS has no transaction to roll them
//! back.

#[cfg(test)]
#[path = "order_test.rs"]
mod order_test;

use serde::Deserialize;

use super::WorkflowError;
use super::product::slugify;
use crate::api::types::{EntryRef, connect};
use crate::api::{ApiClient, ListQuery, Resource};

/// Status written by a full return.
pub const RETURNED_STATUS: &str = "Returned";

/// A product as offered in the line picker.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProductOption {
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Products offered in the line picker, one large page.
///
/// # Errors
///
/// Any request failure.
pub async fn product_options(api: &ApiClient) -> Result<Vec<ProductOption>, WorkflowError> {
    let query = ListQuery::new().page_size(super::forms::CHOICE_PAGE_SIZE);
    let page: crate::api::ListPage<ProductOption> = api.list(Resource::Products, &query).await?;
    Ok(page.items)
}

/// Fields of the purchase form's quick-add product dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuickProduct {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub barcode: String,
}

/// Create a published, off-website product straight from the purchase form.
///
/// # Errors
///
/// [`WorkflowError::MissingField`] for a blank title, else the request
/// failure.
pub async fn quick_create_product(api: &ApiClient, product: &QuickProduct) -> Result<ProductOption, WorkflowError> {
    let title = product.title.trim();
    if title.is_empty() {
        return Err(WorkflowError::MissingField("title"));
    }
    let slug: String = slugify(title)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    let price = if product.price.is_finite() { product.price.max(0.0) } else { 0.0 };
    let created: ProductOption = api
        .create_entry(
            Resource::Products,
            &serde_json::json!({
                "title": title,
                "price": price,
                "description": product.description,
                "barcode": product.barcode,
                "showOnWebsite": false,
                "isTemporary": false,
                "productStatus": "published",
                "slug": slug,
            }),
        )
        .await?;
    tracing::info!(document_id = %created.document_id, "product created from purchase form");
    Ok(created)
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderLine {
    pub product: String,
    pub title: String,
    pub quantity: u32,
    pub price: f64,
    pub warehouse: Option<String>,
}

impl OrderLine {
    #[must_use]
    pub fn total(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

/// Which side of the ledger a draft records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftKind {
    Sale,
    Purchase,
}

impl DraftKind {
    /// Collection holding the order or purchase headers.
    #[must_use]
    pub const fn header(self) -> Resource {
        match self {
            Self::Sale => Resource::Orders,
            Self::Purchase => Resource::Purchases,
        }
    }

    const fn items(self) -> Resource {
        match self {
            Self::Sale => Resource::OrderItems,
            Self::Purchase => Resource::PurchaseItems,
        }
    }

    const fn party_field(self) -> &'static str {
        match self {
            Self::Sale => "customer",
            Self::Purchase => "trader",
        }
    }

    const fn items_field(self) -> &'static str {
        match self {
            Self::Sale => "order_items",
            Self::Purchase => "purchase_items",
        }
    }

    const fn status_field(self) -> &'static str {
        match self {
            Self::Sale => "orderStatus",
            Self::Purchase => "purchaseStatus",
        }
    }

    /// Detail query: counterparty, creator and every line with its product.
    #[must_use]
    pub fn detail_query(self) -> ListQuery {
        ListQuery::new()
            .populate(self.party_field())
            .populate("user")
            .populate(&format!("{}.product", self.items_field()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderDraft {
    kind: DraftKind,
    customer: Option<String>,
    recipient: String,
    lines: Vec<OrderLine>,
    add_taxes: bool,
    paid: bool,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            kind: DraftKind::Sale,
            customer: None,
            recipient: String::new(),
            lines: Vec::new(),
            add_taxes: true,
            paid: false,
        }
    }
}

impl OrderDraft {
    /// A sale to a customer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A purchase from a trader.
    #[must_use]
    pub fn purchase() -> Self {
        Self { kind: DraftKind::Purchase, ..Self::default() }
    }

    #[must_use]
    pub fn kind(&self) -> DraftKind {
        self.kind
    }

    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Customer (sale) or trader (purchase) document id.
    #[must_use]
    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    #[must_use]
    pub fn add_taxes(&self) -> bool {
        self.add_taxes
    }

    #[must_use]
    pub fn paid(&self) -> bool {
        self.paid
    }

    pub fn set_customer(&mut self, document_id: &str) {
        self.customer = Some(document_id.to_owned()).filter(|id| !id.is_empty());
    }

    pub fn set_recipient(&mut self, recipient: &str) {
        recipient.clone_into(&mut self.recipient);
    }

    pub fn set_add_taxes(&mut self, add_taxes: bool) {
        self.add_taxes = add_taxes;
    }

    pub fn set_paid(&mut self, paid: bool) {
        self.paid = paid;
    }

    /// Add a line for `product` with quantity 1. A product already on the
    /// order is not added twice; returns whether a line was added.
    pub fn add_product(&mut self, product: &ProductOption) -> bool {
        if self.lines.iter().any(|line| line.product == product.document_id) {
            return false;
        }
        self.lines.push(OrderLine {
            product: product.document_id.clone(),
            title: product.title.clone(),
            quantity: 1,
            price: product.price.unwrap_or(0.0),
            warehouse: None,
        });
        true
    }

    pub fn set_quantity(&mut self, index: usize, quantity: u32) {
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
    }

    /// Negative or non-finite prices are stored as 0.
    pub fn set_price(&mut self, index: usize, price: f64) {
        if let Some(line) = self.lines.get_mut(index) {
            line.price = if price.is_finite() { price.max(0.0) } else { 0.0 };
        }
    }

    pub fn set_warehouse(&mut self, index: usize, document_id: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            line.warehouse = Some(document_id.to_owned()).filter(|id| !id.is_empty());
        }
    }

    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.lines.iter().map(OrderLine::total).sum()
    }

    /// # Errors
    ///
    /// [`WorkflowError::Invalid`] naming the first missing piece.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.customer.is_none() {
            return Err(WorkflowError::Invalid(match self.kind {
                DraftKind::Sale => "customer is required",
                DraftKind::Purchase => "trader is required",
            }));
        }
        if self.kind == DraftKind::Sale && self.recipient.trim().is_empty() {
            return Err(WorkflowError::Invalid("recipient is required"));
        }
        if self.lines.is_empty() {
            return Err(WorkflowError::Invalid("add at least one product"));
        }
        if self.lines.iter().any(|line| line.warehouse.is_none()) {
            return Err(WorkflowError::Invalid("every line needs a warehouse"));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Create the line items, then the order or purchase.
    ///
    /// # Errors
    ///
    /// Validation errors before any request; otherwise the first failing
    /// request.
    pub async fn submit(&self, api: &ApiClient) -> Result<EntryRef, WorkflowError> {
        self.validate()?;

        let mut item_ids = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let warehouse = line.warehouse.as_deref().unwrap_or_default();
            let item: EntryRef = api
                .create_entry(
                    self.kind.items(),
                    &serde_json::json!({
                        "product": connect([&line.product]),
                        "warehouse": connect([warehouse]),
                        "quantity": line.quantity,
                        "price": line.price,
                    }),
                )
                .await?;
            item_ids.push(item.document_id.ok_or(WorkflowError::MissingDocumentId)?);
        }

        let party = self.customer.as_deref().unwrap_or_default();
        let mut header = serde_json::Map::new();
        header.insert(self.kind.party_field().to_owned(), connect([party]));
        header.insert(self.kind.items_field().to_owned(), connect(&item_ids));
        header.insert("paid".to_owned(), self.paid.into());
        if self.kind == DraftKind::Sale {
            header.insert("recipient".to_owned(), self.recipient.trim().into());
            header.insert("addTaxes".to_owned(), self.add_taxes.into());
        }

        let created: EntryRef = api.create_entry(self.kind.header(), &header).await?;
        tracing::info!(kind = ?self.kind, items = item_ids.len(), document_id = ?created.document_id, "ledger entry created");
        Ok(created)
    }
}

// =============================================================================
// EXISTING ENTRIES
// =============================================================================

/// One order or purchase with its lines populated.
///
/// # Errors
///
/// Any request failure.
pub async fn fetch_entry(api: &ApiClient, kind: DraftKind, document_id: &str) -> Result<serde_json::Value, WorkflowError> {
    Ok(api.get_entry(kind.header(), document_id, &kind.detail_query()).await?)
}

/// # Errors
///
/// Any request failure.
pub async fn mark_paid(api: &ApiClient, kind: DraftKind, document_id: &str) -> Result<(), WorkflowError> {
    let _: serde_json::Value = api
        .update_entry(kind.header(), document_id, &serde_json::json!({ "paid": true }))
        .await?;
    tracing::info!(?kind, document_id, "marked paid");
    Ok(())
}

/// Record a full return. Restocking and balance changes happen server-side.
///
/// # Errors
///
/// Any request failure.
pub async fn mark_returned(api: &ApiClient, kind: DraftKind, document_id: &str) -> Result<(), WorkflowError> {
    let mut body = serde_json::Map::new();
    body.insert(kind.status_field().to_owned(), RETURNED_STATUS.into());
    let _: serde_json::Value = api.update_entry(kind.header(), document_id, &body).await?;
    tracing::info!(?kind, document_id, "marked returned");
    Ok(())
}
