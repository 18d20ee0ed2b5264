//! Flat create/edit forms for the simple collections.
//!
//! Customers, traders and categories are plain `{data: {...}}` entries.
//! Users belong to the auth plugin: their endpoints take the fields
//! unwrapped, are addressed by numeric id, and store a display `name`
//! built from first and last name.
//!
//! A category also carries its products (numeric ids, replaced as a whole
//! on every save) and an optional uploaded image.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::WorkflowError;
use crate::api::resources::FilterOp;
use crate::api::{ApiClient, ListPage, ListQuery, Resource, UploadedFile};

/// Pickers load their options in one page.
pub const CHOICE_PAGE_SIZE: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// Rendered as a password input and never prefilled on edit.
    pub secret: bool,
}

const fn field(key: &'static str, label: &'static str, required: bool) -> FieldSpec {
    FieldSpec { key, label, required, secret: false }
}

const CUSTOMER_FIELDS: &[FieldSpec] = &[
    field("name", "Name", true),
    field("type", "Type", false),
    field("number", "Phone number", false),
];

const TRADER_FIELDS: &[FieldSpec] = &[field("name", "Name", true), field("number", "Phone number", false)];

const CATEGORY_FIELDS: &[FieldSpec] = &[field("title", "Title", true)];

const USER_FIELDS: &[FieldSpec] = &[
    field("firstName", "First name", true),
    field("lastName", "Last name", true),
    field("username", "Username", true),
    field("email", "Email", true),
    FieldSpec { key: "password", label: "Password", required: true, secret: true },
    field("role", "Role id", true),
];

/// Fields of the form for `resource`; `None` for collections edited by a
/// dedicated workflow.
#[must_use]
pub fn fields(resource: Resource) -> Option<&'static [FieldSpec]> {
    match resource {
        Resource::Customers => Some(CUSTOMER_FIELDS),
        Resource::Traders => Some(TRADER_FIELDS),
        Resource::Categories => Some(CATEGORY_FIELDS),
        Resource::Users => Some(USER_FIELDS),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryForm {
    resource: Resource,
    specs: &'static [FieldSpec],
    values: BTreeMap<&'static str, String>,
    editing: bool,
    products: Vec<i64>,
    image: Option<UploadedFile>,
}

impl EntryForm {
    /// Empty create form.
    #[must_use]
    pub fn new(resource: Resource) -> Option<Self> {
        let specs = fields(resource)?;
        Some(Self { resource, specs, values: BTreeMap::new(), editing: false, products: Vec::new(), image: None })
    }

    /// Edit form prefilled from a fetched entry. Secret fields stay blank
    /// and become optional.
    #[must_use]
    pub fn from_entry(resource: Resource, entry: &Value) -> Option<Self> {
        let mut form = Self::new(resource)?;
        form.editing = true;
        for spec in form.specs.iter().filter(|s| !s.secret) {
            let value = match &entry[spec.key] {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Object(role) => match role.get("id").and_then(Value::as_i64) {
                    Some(id) => id.to_string(),
                    None => continue,
                },
                _ => continue,
            };
            form.values.insert(spec.key, value);
        }
        if resource == Resource::Categories {
            form.products = entry["products"]
                .as_array()
                .map(|items| items.iter().filter_map(|p| p["id"].as_i64()).collect())
                .unwrap_or_default();
            form.image = serde_json::from_value(entry["image"].clone()).ok();
        }
        if resource == Resource::Users {
            if let Some((first, last)) = entry["name"].as_str().and_then(|n| n.split_once(' ')) {
                form.values.insert("firstName", first.to_owned());
                form.values.insert("lastName", last.to_owned());
            }
        }
        Some(form)
    }

    /// Fetch an entry and build its edit form. Users are fetched unwrapped
    /// with their role.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Invalid`] for a collection without a form, else the
    /// request failure.
    pub async fn load(api: &ApiClient, resource: Resource, key: &str) -> Result<Self, WorkflowError> {
        if fields(resource).is_none() {
            return Err(WorkflowError::Invalid("collection has no edit form"));
        }
        let entry: Value = if resource == Resource::Users {
            api.get_json_with_query(&resource.entry_path(key), &[("populate", "role")]).await?
        } else if resource == Resource::Categories {
            api.get_entry(resource, key, &ListQuery::new().populate("products").populate("image")).await?
        } else {
            api.get_entry(resource, key, &ListQuery::new()).await?
        };
        Self::from_entry(resource, &entry).ok_or(WorkflowError::Invalid("collection has no edit form"))
    }

    #[must_use]
    pub fn resource(&self) -> Resource {
        self.resource
    }

    #[must_use]
    pub fn specs(&self) -> &'static [FieldSpec] {
        self.specs
    }

    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    /// Set a field; unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(spec) = self.specs.iter().find(|s| s.key == key) {
            self.values.insert(spec.key, value.to_owned());
        }
    }

    /// Whether the form picks products and an image (categories only).
    #[must_use]
    pub fn has_relations(&self) -> bool {
        self.resource == Resource::Categories
    }

    #[must_use]
    pub fn products(&self) -> &[i64] {
        &self.products
    }

    /// Tick or untick a product.
    pub fn toggle_product(&mut self, id: i64) {
        if self.products.contains(&id) {
            self.products.retain(|p| *p != id);
        } else {
            self.products.push(id);
        }
    }

    #[must_use]
    pub fn image(&self) -> Option<&UploadedFile> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Option<UploadedFile>) {
        self.image = image;
    }

    fn is_required(&self, spec: &FieldSpec) -> bool {
        spec.required && !(self.editing && spec.secret)
    }

    /// # Errors
    ///
    /// [`WorkflowError::MissingField`] naming the first blank required field.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        match self.specs.iter().find(|s| self.is_required(s) && self.get(s.key).trim().is_empty()) {
            Some(spec) => Err(WorkflowError::MissingField(spec.label)),
            None => Ok(()),
        }
    }

    /// Request body fields, before any `{data: ...}` wrapping.
    #[must_use]
    pub fn payload(&self) -> Value {
        let mut body = Map::new();
        for spec in self.specs {
            let value = self.get(spec.key).trim();
            if value.is_empty() && !self.is_required(spec) {
                continue;
            }
            body.insert(spec.key.to_owned(), Value::String(value.to_owned()));
        }
        if self.resource == Resource::Users {
            let first = body.remove("firstName");
            let last = body.remove("lastName");
            let name = [first, last]
                .iter()
                .flatten()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            body.insert("name".to_owned(), Value::String(name));
            if let Ok(role) = self.get("role").trim().parse::<i64>() {
                body.insert("role".to_owned(), role.into());
            }
        }
        if self.has_relations() {
            body.insert("products".to_owned(), serde_json::json!(self.products));
            body.insert("image".to_owned(), self.image.as_ref().map_or(Value::Null, |image| image.id.into()));
        }
        Value::Object(body)
    }

    /// Create the entry.
    ///
    /// # Errors
    ///
    /// Validation errors before any request, else the request failure.
    pub async fn create(&self, api: &ApiClient) -> Result<(), WorkflowError> {
        self.validate()?;
        let payload = self.payload();
        if self.resource == Resource::Users {
            let _: Value = api.post_json(self.resource.path(), &payload).await?;
        } else {
            let _: Value = api.create_entry(self.resource, &payload).await?;
        }
        tracing::info!(resource = self.resource.path(), "entry created");
        Ok(())
    }

    /// Update the entry addressed by `key` (document id, or numeric id for
    /// users).
    ///
    /// # Errors
    ///
    /// Validation errors before any request, else the request failure.
    pub async fn update(&self, api: &ApiClient, key: &str) -> Result<(), WorkflowError> {
        self.validate()?;
        let payload = self.payload();
        if self.resource == Resource::Users {
            let _: Value = api.put_json(&self.resource.entry_path(key), &payload).await?;
        } else {
            let _: Value = api.update_entry(self.resource, key, &payload).await?;
        }
        tracing::info!(resource = self.resource.path(), key, "entry updated");
        Ok(())
    }
}

// =============================================================================
// PICKERS
// =============================================================================

/// An existing entry offered in a select box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub document_id: String,
    /// Numeric id; product categories are connected by it.
    pub id: Option<i64>,
    pub label: String,
}

impl Choice {
    /// Label comes from the collection's search field; entries without a
    /// document id are skipped.
    #[must_use]
    pub fn from_entry(resource: Resource, entry: &Value) -> Option<Self> {
        let document_id = entry["documentId"].as_str()?.to_owned();
        let label = entry[resource.search_field()].as_str().unwrap_or(&document_id).to_owned();
        Some(Self { document_id, id: entry["id"].as_i64(), label })
    }
}

/// Products whose title contains `search`, for the category form.
///
/// # Errors
///
/// Any request failure.
pub async fn product_choices(api: &ApiClient, search: &str) -> Result<Vec<Choice>, WorkflowError> {
    let query = ListQuery::new()
        .page_size(CHOICE_PAGE_SIZE)
        .filter("title", FilterOp::Contains, search);
    let page: ListPage<Value> = api.list(Resource::Products, &query).await?;
    Ok(page.items.iter().filter_map(|entry| Choice::from_entry(Resource::Products, entry)).collect())
}

/// Options for a picker over `resource`.
///
/// # Errors
///
/// Any request failure.
pub async fn choices(api: &ApiClient, resource: Resource) -> Result<Vec<Choice>, WorkflowError> {
    let page: ListPage<Value> = api.list(resource, &ListQuery::new().page_size(CHOICE_PAGE_SIZE)).await?;
    Ok(page.items.iter().filter_map(|entry| Choice::from_entry(resource, entry)).collect())
}
