use chrono::NaiveDateTime;
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A product as served by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Price formatted for display, e.g. `$9.99`.
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Stock label shown on the detail page.
    pub fn stock_label(&self) -> String {
        if self.stock > 0 {
            format!("{} in stock", self.stock)
        } else {
            "Out of stock".to_string()
        }
    }

    /// Description shortened to 80 characters for product cards.
    pub fn short_description(&self) -> String {
        let description = self.description.as_deref().unwrap_or_default();
        if description.chars().count() > 80 {
            let head: String = description.chars().take(80).collect();
            format!("{}...", head)
        } else {
            description.to_string()
        }
    }
}

/// The body sent to create or update a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub stock: i32,
    pub category_id: i64,
    pub active: bool,
}

/// The admin product form as typed by the user. Numeric fields stay text
/// until submission, where `to_request` coerces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[garde(length(min = 1, max = 255))]
    #[serde(default)]
    pub name: String,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
    #[garde(length(min = 1))]
    #[serde(default)]
    pub price: String,
    #[garde(skip)]
    #[serde(default)]
    pub image_url: String,
    #[garde(skip)]
    #[serde(default)]
    pub stock: String,
    #[garde(length(min = 1))]
    #[serde(default)]
    pub category_id: String,
    #[garde(skip)]
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            image_url: String::new(),
            stock: String::new(),
            category_id: String::new(),
            active: true,
        }
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            image_url: product.image_url.clone().unwrap_or_default(),
            stock: product.stock.to_string(),
            category_id: product
                .category_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            active: product.active,
        }
    }
}

impl ProductForm {
    /// Coerces the form into the API payload.
    ///
    /// Price becomes a float and category id an integer, both required.
    /// A blank or unparseable stock falls back to 0.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ProductRequest`.
    pub fn to_request(&self) -> Result<ProductRequest> {
        crate::validation::product::validate_product_form(self)?;

        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| AppError::Validation("Price must be a number".to_string()))?;
        if !price.is_finite() {
            return Err(AppError::Validation("Price must be a number".to_string()));
        }

        let category_id: i64 = self
            .category_id
            .trim()
            .parse()
            .map_err(|_| AppError::Validation("Please select a category".to_string()))?;

        let stock = leading_integer(&self.stock).unwrap_or(0);

        Ok(ProductRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            price,
            image_url: self.image_url.clone(),
            stock,
            category_id,
            active: self.active,
        })
    }
}

/// Reads the integer at the start of `input`, ignoring whatever follows it.
/// `"12.5"` and `"12abc"` both yield 12.
fn leading_integer(input: &str) -> Option<i32> {
    let input = input.trim_start();
    let digits_start = usize::from(input.starts_with(['+', '-']));
    let digits_end = input[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(input.len(), |offset| digits_start + offset);
    input[..digits_end].parse().ok()
}
