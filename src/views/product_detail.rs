use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::product::Product;
use crate::services::catalog::CatalogApi;
use crate::views::{PLACEHOLDER_IMAGE, RequestTracker, Ticket};

/// Message shown when the product does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Product not found";

/// Where the detail page links back to.
pub const BACK_HREF: &str = "/products";

/// The detail page of one product, addressed by its route parameter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailView {
    /// The raw `{id}` route parameter.
    pub id: String,
    pub loading: bool,
    pub error: Option<String>,
    pub product: Option<Product>,
    #[serde(skip)]
    tracker: RequestTracker,
}

impl ProductDetailView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            loading: true,
            error: None,
            product: None,
            tracker: RequestTracker::default(),
        }
    }

    /// Switches to another product id; the next `load` fetches it.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
        self.product = None;
        self.error = None;
        self.loading = true;
    }

    /// Marks the view as loading and returns the ticket for the fetch.
    pub fn begin_load(&mut self) -> Ticket {
        self.loading = true;
        self.error = None;
        self.tracker.issue()
    }

    /// Adopts the product fetched under `ticket`. Stale tickets are ignored.
    ///
    /// A missing product renders the not-found message; any other failure
    /// renders the error's own message.
    pub fn apply_load(&mut self, ticket: Ticket, result: Result<Product>) {
        if !self.tracker.is_current(ticket) {
            tracing::debug!("Discarding stale product response for id {}", self.id);
            return;
        }

        match result {
            Ok(product) => {
                self.product = Some(product);
                self.error = None;
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("Product {} not found", self.id);
                self.product = None;
                self.error = Some(NOT_FOUND_MESSAGE.to_string());
            }
            Err(e) => {
                tracing::error!("Error fetching product {}: {}", self.id, e);
                self.product = None;
                self.error = Some(e.user_message());
            }
        }
        self.loading = false;
    }

    /// Fetches the product. An id that is not a number is reported as not
    /// found without calling the API.
    pub async fn load<C: CatalogApi + ?Sized>(&mut self, api: &C) {
        let ticket = self.begin_load();
        let result = match self.id.trim().parse::<i64>() {
            Ok(id) => api.get_product(id).await,
            Err(_) => Err(AppError::NotFound(format!("Invalid product id '{}'", self.id))),
        };
        self.apply_load(ticket, result);
    }

    /// Whether the product could not be found.
    pub fn is_not_found(&self) -> bool {
        self.error.as_deref() == Some(NOT_FOUND_MESSAGE)
    }

    /// Renders the page.
    pub fn render(&self) -> DetailPage {
        DetailPage {
            loading: self.loading,
            error: self.error.clone(),
            back_href: BACK_HREF.to_string(),
            product: self.product.as_ref().map(|product| ProductDetails {
                id: product.id,
                name: product.name.clone(),
                category_name: product.category_name.clone().unwrap_or_default(),
                description: product.description.clone().unwrap_or_default(),
                price: product.display_price(),
                stock_label: product.stock_label(),
                in_stock: product.stock > 0,
                image_url: product
                    .image_url
                    .clone()
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            }),
        }
    }
}

/// The product section of the detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub id: i64,
    pub name: String,
    pub category_name: String,
    pub description: String,
    pub price: String,
    pub stock_label: String,
    pub in_stock: bool,
    pub image_url: String,
}

/// The rendered detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPage {
    pub loading: bool,
    pub error: Option<String>,
    pub back_href: String,
    pub product: Option<ProductDetails>,
}
