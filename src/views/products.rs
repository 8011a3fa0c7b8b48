use serde::Serialize;

use crate::error::Result;
use crate::models::{category::Category, page::Paged, product::Product};
use crate::services::catalog::{CatalogApi, ProductQuery};
use crate::views::{PLACEHOLDER_IMAGE, RequestTracker, Ticket};

/// Products per page on the public listing.
pub const LISTING_PAGE_SIZE: u32 = 9;

/// What the listing is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ListingMode {
    /// Every active product, ordered by name.
    All,
    /// Products of one category.
    Category(i64),
    /// Products matching a submitted keyword; the category filter is ignored.
    Search(String),
}

/// One fetch of the listing, tagged with the ticket it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub ticket: Ticket,
    pub mode: ListingMode,
    pub page: u32,
    pub size: u32,
}

impl ListingRequest {
    /// Runs the request against `api`.
    pub async fn execute<C: CatalogApi + ?Sized>(&self, api: &C) -> Result<Paged<Product>> {
        match &self.mode {
            ListingMode::All => {
                api.list_products(&ProductQuery::sorted(self.page, self.size, "name", "asc"))
                    .await
            }
            ListingMode::Category(id) => api.products_by_category(*id, self.page, self.size).await,
            ListingMode::Search(keyword) => api.search_products(keyword, self.page, self.size).await,
        }
    }
}

/// The product listing with category filter, search, and pagination.
///
/// Category filter and search are mutually exclusive: selecting a category
/// clears the keyword, submitting a keyword ignores the category. Either
/// change returns to page 0. Every state change that needs new data returns
/// the `ListingRequest` to run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub loading: bool,
    pub error: Option<String>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub page: u32,
    pub total_pages: u32,
    /// The text in the search box, submitted or not.
    pub keyword: String,
    pub selected_category: Option<i64>,
    pub mode: ListingMode,
    #[serde(skip)]
    tracker: RequestTracker,
    #[serde(skip)]
    categories_tracker: RequestTracker,
}

impl Default for ProductListing {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ProductListing {
    /// Creates a listing, optionally pre-filtered by `category`.
    pub fn new(category: Option<i64>) -> Self {
        Self {
            loading: true,
            error: None,
            products: Vec::new(),
            categories: Vec::new(),
            page: 0,
            total_pages: 0,
            keyword: String::new(),
            selected_category: category,
            mode: category.map_or(ListingMode::All, ListingMode::Category),
            tracker: RequestTracker::default(),
            categories_tracker: RequestTracker::default(),
        }
    }

    /// Rebuilds a listing from navigation parameters. A non-blank keyword
    /// selects search mode regardless of `category`.
    pub fn from_params(category: Option<i64>, keyword: Option<&str>, page: u32) -> Self {
        let mut listing = Self::new(category);
        if let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) {
            listing.keyword = keyword.to_string();
            listing.mode = ListingMode::Search(keyword.to_string());
        }
        listing.page = page;
        listing
    }

    /// The request for the current mode and page.
    pub fn begin_fetch(&mut self) -> ListingRequest {
        self.loading = true;
        self.error = None;
        ListingRequest {
            ticket: self.tracker.issue(),
            mode: self.mode.clone(),
            page: self.page,
            size: LISTING_PAGE_SIZE,
        }
    }

    /// Adopts the page fetched under `ticket`. Stale tickets are ignored.
    pub fn apply_fetch(&mut self, ticket: Ticket, result: Result<Paged<Product>>) {
        if !self.tracker.is_current(ticket) {
            tracing::debug!("Discarding stale products response");
            return;
        }

        match result {
            Ok(paged) => {
                self.products = paged.content;
                self.total_pages = paged.total_pages;
            }
            Err(e) => {
                tracing::error!("Error fetching products: {}", e);
                self.products.clear();
                self.total_pages = 0;
                self.error = Some(e.user_message());
            }
        }
        self.loading = false;
    }

    /// Fetches the current page.
    pub async fn refresh<C: CatalogApi + ?Sized>(&mut self, api: &C) {
        let request = self.begin_fetch();
        let result = request.execute(api).await;
        self.apply_fetch(request.ticket, result);
    }

    /// Issues the ticket for the category filter fetch.
    pub fn begin_categories(&mut self) -> Ticket {
        self.categories_tracker.issue()
    }

    /// Adopts the categories fetched under `ticket`. A failure leaves the
    /// filter bar empty without disturbing the product grid.
    pub fn apply_categories(&mut self, ticket: Ticket, result: Result<Vec<Category>>) {
        if !self.categories_tracker.is_current(ticket) {
            return;
        }
        match result {
            Ok(categories) => self.categories = categories,
            Err(e) => tracing::error!("Error fetching categories: {}", e),
        }
    }

    /// Fetches the categories of the filter bar.
    pub async fn load_categories<C: CatalogApi + ?Sized>(&mut self, api: &C) {
        let ticket = self.begin_categories();
        let result = api.list_categories().await;
        self.apply_categories(ticket, result);
    }

    /// Selects a category (`None` for "All"), clearing the keyword and
    /// returning to page 0.
    pub fn select_category(&mut self, category: Option<i64>) -> ListingRequest {
        self.selected_category = category;
        self.keyword.clear();
        self.page = 0;
        self.mode = category.map_or(ListingMode::All, ListingMode::Category);
        self.begin_fetch()
    }

    /// Updates the search box without fetching.
    pub fn set_keyword(&mut self, keyword: &str) {
        self.keyword = keyword.to_string();
    }

    /// Submits the search box.
    ///
    /// A non-blank keyword searches from page 0, ignoring the category. A
    /// blank one refetches the category/all mode at the current page.
    pub fn submit_search(&mut self) -> ListingRequest {
        let keyword = self.keyword.trim().to_string();
        if keyword.is_empty() {
            self.mode = self
                .selected_category
                .map_or(ListingMode::All, ListingMode::Category);
        } else {
            self.mode = ListingMode::Search(keyword);
            self.page = 0;
        }
        self.begin_fetch()
    }

    /// Moves to the next page, or returns `None` on the last one.
    pub fn next_page(&mut self) -> Option<ListingRequest> {
        if !self.can_go_next() {
            return None;
        }
        self.page += 1;
        Some(self.begin_fetch())
    }

    /// Moves to the previous page, or returns `None` on the first one.
    pub fn previous_page(&mut self) -> Option<ListingRequest> {
        if !self.can_go_previous() {
            return None;
        }
        self.page -= 1;
        Some(self.begin_fetch())
    }

    /// Whether "Previous" is enabled.
    pub fn can_go_previous(&self) -> bool {
        self.page > 0
    }

    /// Whether "Next" is enabled, i.e. `page < totalPages - 1`.
    pub fn can_go_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    /// Whether the pagination bar is shown at all.
    pub fn shows_pagination(&self) -> bool {
        self.total_pages > 1
    }

    /// Renders the listing together with its navigation targets.
    pub fn render(&self) -> ListingPage {
        let mut filters = vec![FilterLink {
            label: "All".to_string(),
            active: self.selected_category.is_none(),
            target: ListingParams::category(None),
        }];
        filters.extend(self.categories.iter().map(|category| FilterLink {
            label: category.name.clone(),
            active: self.selected_category == Some(category.id),
            target: ListingParams::category(Some(category.id)),
        }));

        let current = ListingParams::from_mode(&self.mode, self.page);
        let pagination = self.shows_pagination().then(|| Pagination {
            page: self.page,
            total_pages: self.total_pages,
            label: format!("Page {} of {}", self.page.saturating_add(1), self.total_pages),
            previous_disabled: !self.can_go_previous(),
            next_disabled: !self.can_go_next(),
            previous: self
                .can_go_previous()
                .then(|| current.with_page(self.page - 1)),
            next: self.can_go_next().then(|| current.with_page(self.page + 1)),
        });

        let empty = !self.loading && self.error.is_none() && self.products.is_empty();

        ListingPage {
            title: "Our Menu".to_string(),
            loading: self.loading,
            error: self.error.clone(),
            empty_message: empty.then(|| {
                "No products found. Try adjusting your search or filter criteria.".to_string()
            }),
            keyword: self.keyword.clone(),
            mode: self.mode.clone(),
            filters,
            cards: self.products.iter().map(ProductCard::from).collect(),
            pagination,
        }
    }
}

/// Navigation parameters that reproduce a listing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub page: u32,
}

impl ListingParams {
    fn category(category: Option<i64>) -> Self {
        Self {
            category,
            keyword: None,
            page: 0,
        }
    }

    fn from_mode(mode: &ListingMode, page: u32) -> Self {
        match mode {
            ListingMode::All => Self { category: None, keyword: None, page },
            ListingMode::Category(id) => Self { category: Some(*id), keyword: None, page },
            ListingMode::Search(keyword) => Self {
                category: None,
                keyword: Some(keyword.clone()),
                page,
            },
        }
    }

    fn with_page(&self, page: u32) -> Self {
        Self { page, ..self.clone() }
    }
}

/// A category filter button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterLink {
    pub label: String,
    pub active: bool,
    pub target: ListingParams,
}

/// The pagination bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub label: String,
    pub previous_disabled: bool,
    pub next_disabled: bool,
    pub previous: Option<ListingParams>,
    pub next: Option<ListingParams>,
}

/// A product card in the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub category_name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub href: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category_name: product.category_name.clone().unwrap_or_default(),
            description: product.short_description(),
            price: product.display_price(),
            image_url: product
                .image_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            href: format!("/products/{}", product.id),
        }
    }
}

/// The rendered listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub title: String,
    pub loading: bool,
    pub error: Option<String>,
    pub empty_message: Option<String>,
    pub keyword: String,
    pub mode: ListingMode,
    pub filters: Vec<FilterLink>,
    pub cards: Vec<ProductCard>,
    pub pagination: Option<Pagination>,
}
