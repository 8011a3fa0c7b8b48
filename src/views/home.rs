use serde::Serialize;

use crate::error::Result;
use crate::models::category::Category;
use crate::services::catalog::CatalogApi;
use crate::views::{PLACEHOLDER_IMAGE, RequestTracker, Ticket};

/// The landing page: a hero section and the category grid.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub loading: bool,
    pub error: Option<String>,
    pub categories: Vec<Category>,
    #[serde(skip)]
    tracker: RequestTracker,
}

/// A category card linking to the filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCard {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub href: String,
}

impl HomeView {
    /// Creates a view that has not fetched yet.
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Marks the view as loading and returns the ticket for the fetch.
    pub fn begin_load(&mut self) -> Ticket {
        self.loading = true;
        self.error = None;
        self.tracker.issue()
    }

    /// Adopts the categories fetched under `ticket`. Stale tickets are ignored.
    pub fn apply_load(&mut self, ticket: Ticket, result: Result<Vec<Category>>) {
        if !self.tracker.is_current(ticket) {
            tracing::debug!("Discarding stale categories response");
            return;
        }

        match result {
            Ok(categories) => self.categories = categories,
            Err(e) => {
                tracing::error!("Error fetching categories: {}", e);
                self.error = Some(e.user_message());
            }
        }
        self.loading = false;
    }

    /// Fetches the categories.
    pub async fn load<C: CatalogApi + ?Sized>(&mut self, api: &C) {
        let ticket = self.begin_load();
        let result = api.list_categories().await;
        self.apply_load(ticket, result);
    }

    /// Cards for the category grid.
    pub fn cards(&self) -> Vec<CategoryCard> {
        self.categories
            .iter()
            .map(|category| CategoryCard {
                id: category.id,
                name: category.name.clone(),
                description: category.description.clone().unwrap_or_default(),
                image_url: category
                    .image_url
                    .clone()
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                href: format!("/products?category={}", category.id),
            })
            .collect()
    }
}
