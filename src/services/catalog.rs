use async_trait::async_trait;
use http::Method;

use crate::error::Result;
use crate::models::{
    category::{Category, CategoryRequest},
    page::Paged,
    product::{Product, ProductRequest},
    user::MessageResponse,
};
use crate::services::api::{ApiClient, AuthorizedClient};

/// Paging and ordering of `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

impl ProductQuery {
    /// A page without explicit ordering.
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort_by: None,
            sort_dir: None,
        }
    }

    /// A page ordered by `sort_by` in `sort_dir` (`asc` or `desc`).
    pub fn sorted(page: u32, size: u32, sort_by: &str, sort_dir: &str) -> Self {
        Self {
            page,
            size,
            sort_by: Some(sort_by.to_string()),
            sort_dir: Some(sort_dir.to_string()),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(sort_by) = &self.sort_by {
            params.push(("sortBy", sort_by.clone()));
        }
        if let Some(sort_dir) = &self.sort_dir {
            params.push(("sortDir", sort_dir.clone()));
        }
        params
    }
}

/// The catalog endpoints of the remote API.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /categories`.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// `GET /categories/{id}`.
    async fn get_category(&self, id: i64) -> Result<Category>;

    /// `POST /categories`.
    async fn create_category(&self, request: &CategoryRequest) -> Result<Category>;

    /// `PUT /categories/{id}`.
    async fn update_category(&self, id: i64, request: &CategoryRequest) -> Result<Category>;

    /// `DELETE /categories/{id}`.
    async fn delete_category(&self, id: i64) -> Result<MessageResponse>;

    /// `GET /products?page&size&sortBy&sortDir`.
    async fn list_products(&self, query: &ProductQuery) -> Result<Paged<Product>>;

    /// `GET /products/category/{id}?page&size`.
    async fn products_by_category(&self, category_id: i64, page: u32, size: u32)
    -> Result<Paged<Product>>;

    /// `GET /products/search?keyword&page&size`.
    async fn search_products(&self, keyword: &str, page: u32, size: u32) -> Result<Paged<Product>>;

    /// `GET /products/{id}`.
    async fn get_product(&self, id: i64) -> Result<Product>;

    /// `POST /products`.
    async fn create_product(&self, request: &ProductRequest) -> Result<Product>;

    /// `PUT /products/{id}`.
    async fn update_product(&self, id: i64, request: &ProductRequest) -> Result<Product>;

    /// `DELETE /products/{id}`.
    async fn delete_product(&self, id: i64) -> Result<MessageResponse>;
}

#[async_trait]
impl CatalogApi for AuthorizedClient {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        tracing::debug!("Fetching categories");
        let builder = self.api().request(Method::GET, "/categories");
        self.api().send(builder, self.token()).await
    }

    async fn get_category(&self, id: i64) -> Result<Category> {
        tracing::debug!("Fetching category by id: {}", id);
        let builder = self.api().request(Method::GET, &format!("/categories/{}", id));
        self.api().send(builder, self.token()).await
    }

    async fn create_category(&self, request: &CategoryRequest) -> Result<Category> {
        tracing::info!("Creating category: {}", request.name);
        let builder = ApiClient::json_body(self.api().request(Method::POST, "/categories"), request)?;
        self.api().send(builder, self.token()).await
    }

    async fn update_category(&self, id: i64, request: &CategoryRequest) -> Result<Category> {
        tracing::info!("Updating category id: {}", id);
        let builder = ApiClient::json_body(
            self.api().request(Method::PUT, &format!("/categories/{}", id)),
            request,
        )?;
        self.api().send(builder, self.token()).await
    }

    async fn delete_category(&self, id: i64) -> Result<MessageResponse> {
        tracing::info!("Deleting category id: {}", id);
        let builder = self.api().request(Method::DELETE, &format!("/categories/{}", id));
        self.api().send_or_default(builder, self.token()).await
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<Paged<Product>> {
        tracing::debug!("Fetching products - page: {}, size: {}", query.page, query.size);
        let builder = self
            .api()
            .request(Method::GET, "/products")
            .query(&query.params());
        self.api().send(builder, self.token()).await
    }

    async fn products_by_category(
        &self,
        category_id: i64,
        page: u32,
        size: u32,
    ) -> Result<Paged<Product>> {
        tracing::debug!("Fetching products by category: {}", category_id);
        let builder = self
            .api()
            .request(Method::GET, &format!("/products/category/{}", category_id))
            .query(&[("page", page), ("size", size)]);
        self.api().send(builder, self.token()).await
    }

    async fn search_products(&self, keyword: &str, page: u32, size: u32) -> Result<Paged<Product>> {
        tracing::debug!("Searching products with keyword: {}", keyword);
        let page = page.to_string();
        let size = size.to_string();
        let builder = self
            .api()
            .request(Method::GET, "/products/search")
            .query(&[("keyword", keyword), ("page", page.as_str()), ("size", size.as_str())]);
        self.api().send(builder, self.token()).await
    }

    async fn get_product(&self, id: i64) -> Result<Product> {
        tracing::debug!("Fetching product by id: {}", id);
        let builder = self.api().request(Method::GET, &format!("/products/{}", id));
        self.api().send(builder, self.token()).await
    }

    async fn create_product(&self, request: &ProductRequest) -> Result<Product> {
        tracing::info!("Creating product: {}", request.name);
        let builder = ApiClient::json_body(self.api().request(Method::POST, "/products"), request)?;
        self.api().send(builder, self.token()).await
    }

    async fn update_product(&self, id: i64, request: &ProductRequest) -> Result<Product> {
        tracing::info!("Updating product id: {}", id);
        let builder = ApiClient::json_body(
            self.api().request(Method::PUT, &format!("/products/{}", id)),
            request,
        )?;
        self.api().send(builder, self.token()).await
    }

    async fn delete_product(&self, id: i64) -> Result<MessageResponse> {
        tracing::info!("Deleting product id: {}", id);
        let builder = self.api().request(Method::DELETE, &format!("/products/{}", id));
        self.api().send_or_default(builder, self.token()).await
    }
}
