use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{
    category::Category,
    page::Paged,
    product::{Product, ProductForm},
};
use crate::services::catalog::{CatalogApi, ProductQuery};
use crate::views::{RequestTracker, Ticket};

/// Products fetched by the admin table. The table is not paged; a catalog
/// larger than this shows only its first page.
pub const ADMIN_PAGE_SIZE: u32 = 100;

pub const CREATED_MESSAGE: &str = "Product created successfully!";
pub const UPDATED_MESSAGE: &str = "Product updated successfully!";
pub const DELETED_MESSAGE: &str = "Product deleted successfully!";
pub const SAVE_FAILED_MESSAGE: &str = "Error saving product";
pub const DELETE_FAILED_MESSAGE: &str = "Error deleting product";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AdminTab {
    #[default]
    Products,
    Categories,
}

impl AdminTab {
    /// Parses the `tab` query parameter; anything unknown is the products tab.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("categories") => AdminTab::Categories,
            _ => AdminTab::Products,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FlashKind {
    Success,
    Error,
}

/// The alert shown above the admin tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub text: String,
    pub kind: FlashKind,
}

impl Flash {
    fn success(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: FlashKind::Success,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FlashKind::Error,
        }
    }
}

/// The server's own message for a failed mutation, when it sent one.
fn server_message(error: &AppError) -> Option<String> {
    match error {
        AppError::Validation(msg)
        | AppError::Authentication(msg)
        | AppError::Forbidden(msg)
        | AppError::NotFound(msg)
        | AppError::Api { message: msg, .. } => {
            Some(msg.clone()).filter(|m| !m.trim().is_empty())
        }
        _ => None,
    }
}

/// The admin console: product table with inline create/edit form and
/// delete-with-confirmation, plus a read-only categories tab.
///
/// Every successful mutation is followed by a full refetch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPanel {
    pub loading: bool,
    /// Failure of the last data fetch.
    pub error: Option<String>,
    /// Outcome of the last mutation.
    pub message: Option<Flash>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub active_tab: AdminTab,
    pub show_form: bool,
    pub editing: Option<Product>,
    pub form: ProductForm,
    pub pending_delete: Option<i64>,
    #[serde(skip)]
    tracker: RequestTracker,
}

impl Default for AdminPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminPanel {
    pub fn new() -> Self {
        Self {
            loading: true,
            error: None,
            message: None,
            products: Vec::new(),
            categories: Vec::new(),
            active_tab: AdminTab::Products,
            show_form: false,
            editing: None,
            form: ProductForm::default(),
            pending_delete: None,
            tracker: RequestTracker::default(),
        }
    }

    /// Marks the panel as loading and returns the ticket for the fetch.
    pub fn begin_load(&mut self) -> Ticket {
        self.loading = true;
        self.error = None;
        self.tracker.issue()
    }

    /// Adopts products and categories fetched under `ticket`. Stale tickets
    /// are ignored.
    pub fn apply_load(
        &mut self,
        ticket: Ticket,
        products: Result<Paged<Product>>,
        categories: Result<Vec<Category>>,
    ) {
        if !self.tracker.is_current(ticket) {
            tracing::debug!("Discarding stale admin data");
            return;
        }

        match (products, categories) {
            (Ok(products), Ok(categories)) => {
                self.products = products.content;
                self.categories = categories;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!("Error fetching admin data: {}", e);
                self.error = Some(e.user_message());
            }
        }
        self.loading = false;
    }

    /// Fetches products and categories concurrently.
    pub async fn load<C: CatalogApi + ?Sized>(&mut self, api: &C) {
        let ticket = self.begin_load();
        let query = ProductQuery::page(0, ADMIN_PAGE_SIZE);
        let (products, categories) =
            futures::future::join(api.list_products(&query), api.list_categories()).await;
        self.apply_load(ticket, products, categories);
    }

    pub fn select_tab(&mut self, tab: AdminTab) {
        self.active_tab = tab;
    }

    /// The "Add Product" / "Cancel" button: flips form visibility and always
    /// leaves an empty create form behind.
    pub fn toggle_form(&mut self) {
        self.show_form = !self.show_form;
        self.editing = None;
        self.form = ProductForm::default();
    }

    /// Opens the form pre-filled with `product`.
    pub fn edit(&mut self, product: Product) {
        self.form = ProductForm::from(&product);
        self.editing = Some(product);
        self.show_form = true;
    }

    pub fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    /// Creates or updates the product described by the form.
    ///
    /// On success the form closes and resets, a success message is shown,
    /// and the data is refetched. On failure the form stays open and the
    /// server's message (or a generic one) is shown.
    ///
    /// # Returns
    ///
    /// The failure, if any, for callers that report a status.
    pub async fn submit<C: CatalogApi + ?Sized>(&mut self, api: &C) -> Result<()> {
        self.message = None;

        let payload = match self.form.to_request() {
            Ok(payload) => payload,
            Err(e) => {
                self.message = Some(Flash::error(e.user_message()));
                return Err(e);
            }
        };

        let outcome = match &self.editing {
            Some(product) => api
                .update_product(product.id, &payload)
                .await
                .map(|_| UPDATED_MESSAGE),
            None => api.create_product(&payload).await.map(|_| CREATED_MESSAGE),
        };

        match outcome {
            Ok(text) => {
                tracing::info!("✅ {}", text);
                self.message = Some(Flash::success(text));
                self.show_form = false;
                self.editing = None;
                self.form = ProductForm::default();
                self.load(api).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("❌ Saving product failed: {}", e);
                let text = server_message(&e).unwrap_or_else(|| SAVE_FAILED_MESSAGE.to_string());
                self.message = Some(Flash::error(text));
                Err(e)
            }
        }
    }

    /// Asks for confirmation before deleting product `id`.
    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the product awaiting confirmation and refetches on success.
    pub async fn confirm_delete<C: CatalogApi + ?Sized>(&mut self, api: &C) -> Result<()> {
        let id = self
            .pending_delete
            .take()
            .ok_or_else(|| AppError::Validation("No product selected for deletion".to_string()))?;

        match api.delete_product(id).await {
            Ok(_) => {
                tracing::info!("✅ Product {} deleted", id);
                self.message = Some(Flash::success(DELETED_MESSAGE));
                self.load(api).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("❌ Deleting product {} failed: {}", id, e);
                self.message = Some(Flash::error(DELETE_FAILED_MESSAGE));
                Err(e)
            }
        }
    }

    /// Renders the panel.
    pub fn render(&self) -> AdminPage {
        let form = self.show_form.then(|| FormSection {
            title: if self.editing.is_some() { "Edit Product" } else { "New Product" }.to_string(),
            submit_label: if self.editing.is_some() { "Update" } else { "Create" }.to_string(),
            values: self.form.clone(),
            category_options: self
                .categories
                .iter()
                .map(|c| CategoryOption {
                    value: c.id.to_string(),
                    label: c.name.clone(),
                })
                .collect(),
        });

        AdminPage {
            title: "Admin Panel".to_string(),
            loading: self.loading,
            error: self.error.clone(),
            message: self.message.clone(),
            active_tab: self.active_tab,
            products_tab_label: format!("Products ({})", self.products.len()),
            categories_tab_label: format!("Categories ({})", self.categories.len()),
            toggle_label: if self.show_form { "Cancel" } else { "Add Product" }.to_string(),
            form,
            pending_delete: self.pending_delete,
            product_rows: self
                .products
                .iter()
                .map(|p| ProductRow {
                    id: p.id,
                    name: p.name.clone(),
                    price: p.display_price(),
                    stock: p.stock,
                    category: p.category_name.clone().unwrap_or_default(),
                    active: yes_no(p.active),
                })
                .collect(),
            category_rows: self
                .categories
                .iter()
                .map(|c| CategoryRow {
                    id: c.id,
                    name: c.name.clone(),
                    description: c.description.clone().unwrap_or_default(),
                    active: yes_no(c.active),
                })
                .collect(),
        }
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    pub title: String,
    pub submit_label: String,
    pub values: ProductForm,
    pub category_options: Vec<CategoryOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub stock: i32,
    pub category: String,
    pub active: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub active: String,
}

/// The rendered admin panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPage {
    pub title: String,
    pub loading: bool,
    pub error: Option<String>,
    pub message: Option<Flash>,
    pub active_tab: AdminTab,
    pub products_tab_label: String,
    pub categories_tab_label: String,
    pub toggle_label: String,
    pub form: Option<FormSection>,
    pub pending_delete: Option<i64>,
    pub product_rows: Vec<ProductRow>,
    pub category_rows: Vec<CategoryRow>,
}
