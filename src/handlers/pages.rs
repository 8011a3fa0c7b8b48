use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{AppError, Result},
    models::product::ProductForm,
    services::{catalog::CatalogApi, session::SessionStore},
    state::AppState,
    views::{
        admin::{AdminPage, AdminPanel, AdminTab},
        home::{CategoryCard, HomeView},
        navbar::NavbarView,
        product_detail::{DetailPage, ProductDetailView},
        products::{ListingPage, ProductListing},
    },
};

/// A rendered page together with the navigation bar.
#[derive(Serialize)]
pub struct Page<T: Serialize> {
    pub navbar: NavbarView,
    #[serde(flatten)]
    pub content: T,
}

impl<T: Serialize> Page<T> {
    fn new(session: &SessionStore, content: T) -> Json<Self> {
        Json(Self {
            navbar: NavbarView::from_session(session),
            content,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub cta_label: String,
    pub cta_href: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub hero: Hero,
    pub section_title: String,
    pub loading: bool,
    pub error: Option<String>,
    pub categories: Vec<CategoryCard>,
}

/// A credential form and where it posts to.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPage {
    pub title: String,
    pub action: String,
    pub fields: Vec<String>,
    pub alternate_label: String,
    pub alternate_href: String,
}

/// Query string of the product listing.
#[derive(Deserialize, Debug, Default)]
pub struct ListingQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<i64>,
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
}

/// Reads an optional query value, treating `key=` like an absent key.
fn empty_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Query string of the admin panel.
#[derive(Deserialize, Debug, Default)]
pub struct AdminQuery {
    pub tab: Option<String>,
}

/// Query string of the admin delete action.
#[derive(Deserialize, Debug, Default)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Renders the landing page.
#[axum::debug_handler]
pub async fn home(
    State(state): State<AppState>,
    Extension(session): Extension<SessionStore>,
) -> Json<Page<HomePage>> {
    let api = state.api.for_session(&session);
    let mut view = HomeView::new();
    view.load(&api).await;

    let content = HomePage {
        hero: Hero {
            title: "Delicious Food, Delivered Fresh".to_string(),
            subtitle: "Explore our wide range of cuisines and find your favorite meals. \
                       From pizzas to sushi, we have it all."
                .to_string(),
            cta_label: "Browse Menu".to_string(),
            cta_href: "/products".to_string(),
        },
        section_title: "Our Categories".to_string(),
        loading: view.loading,
        error: view.error.clone(),
        categories: view.cards(),
    };

    Page::new(&session, content)
}

/// Renders the product listing for the given filter, search, and page.
#[axum::debug_handler]
pub async fn products(
    State(state): State<AppState>,
    Extension(session): Extension<SessionStore>,
    Query(query): Query<ListingQuery>,
) -> Json<Page<ListingPage>> {
    let api = state.api.for_session(&session);
    let mut listing = ProductListing::from_params(
        query.category,
        query.keyword.as_deref(),
        query.page.unwrap_or(0),
    );

    let request = listing.begin_fetch();
    let categories_ticket = listing.begin_categories();
    let (products, categories) =
        futures::future::join(request.execute(&api), api.list_categories()).await;
    listing.apply_fetch(request.ticket, products);
    listing.apply_categories(categories_ticket, categories);

    Page::new(&session, listing.render())
}

/// Renders one product; a missing product answers 404 with the not-found view.
#[axum::debug_handler]
pub async fn product_detail(
    State(state): State<AppState>,
    Extension(session): Extension<SessionStore>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Page<DetailPage>>) {
    let api = state.api.for_session(&session);
    let mut view = ProductDetailView::new(id);
    view.load(&api).await;

    let status = if view.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, Page::new(&session, view.render()))
}

/// Renders the login form.
#[axum::debug_handler]
pub async fn login_page(Extension(session): Extension<SessionStore>) -> Json<Page<FormPage>> {
    Page::new(
        &session,
        FormPage {
            title: "Login".to_string(),
            action: "/auth/login".to_string(),
            fields: vec!["username".to_string(), "password".to_string()],
            alternate_label: "Register".to_string(),
            alternate_href: "/register".to_string(),
        },
    )
}

/// Renders the registration form.
#[axum::debug_handler]
pub async fn register_page(Extension(session): Extension<SessionStore>) -> Json<Page<FormPage>> {
    Page::new(
        &session,
        FormPage {
            title: "Register".to_string(),
            action: "/auth/register".to_string(),
            fields: vec![
                "username".to_string(),
                "email".to_string(),
                "password".to_string(),
            ],
            alternate_label: "Login".to_string(),
            alternate_href: "/login".to_string(),
        },
    )
}

async fn loaded_panel<C: CatalogApi + ?Sized>(api: &C, tab: AdminTab) -> AdminPanel {
    let mut panel = AdminPanel::new();
    panel.select_tab(tab);
    panel.load(api).await;
    panel
}

fn admin_response(session: &SessionStore, status: StatusCode, panel: &AdminPanel) -> Response {
    let page: Json<Page<AdminPage>> = Page::new(session, panel.render());
    (status, page).into_response()
}

/// Renders the admin panel.
#[axum::debug_handler]
pub async fn admin(
    State(state): State<AppState>,
    Extension(session): Extension<SessionStore>,
    Query(query): Query<AdminQuery>,
) -> Response {
    let api = state.api.for_session(&session);
    let panel = loaded_panel(&api, AdminTab::parse(query.tab.as_deref())).await;
    admin_response(&session, StatusCode::OK, &panel)
}

/// Creates a product from the submitted form.
#[axum::debug_handler]
pub async fn admin_create_product(
    State(state): State<AppState>,
    Extension(session): Extension<SessionStore>,
    Json(form): Json<ProductForm>,
) -> Response {
    let api = state.api.for_session(&session);
    let mut panel = loaded_panel(&api, AdminTab::Products).await;
    panel.toggle_form();
    *panel.form_mut() = form;

    let status = match panel.submit(&api).await {
        Ok(()) => StatusCode::CREATED,
        Err(e) => e.status(),
    };
    admin_response(&session, status, &panel)
}

/// Updates product `id` from the submitted form.
#[axum::debug_handler]
pub async fn admin_update_product(
    State(state): State<AppState>,
    Extension(session): Extension<SessionStore>,
    Path(id): Path<i64>,
    Json(form): Json<ProductForm>,
) -> Result<Response> {
    let api = state.api.for_session(&session);
    let mut panel = loaded_panel(&api, AdminTab::Products).await;

    let product = api.get_product(id).await?;
    panel.edit(product);
    *panel.form_mut() = form;

    let status = match panel.submit(&api).await {
        Ok(()) => StatusCode::OK,
        Err(e) => e.status(),
    };
    Ok(admin_response(&session, status, &panel))
}

/// Deletes product `id`. Without `confirm=true` the panel is rendered with
/// the deletion awaiting confirmation and nothing is deleted.
#[axum::debug_handler]
pub async fn admin_delete_product(
    State(state): State<AppState>,
    Extension(session): Extension<SessionStore>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    let api = state.api.for_session(&session);
    let mut panel = loaded_panel(&api, AdminTab::Products).await;
    panel.request_delete(id);

    if !query.confirm {
        tracing::debug!("Deletion of product {} awaits confirmation", id);
        return admin_response(&session, StatusCode::OK, &panel);
    }

    let status = match panel.confirm_delete(&api).await {
        Ok(()) => StatusCode::OK,
        Err(e) => e.status(),
    };
    admin_response(&session, status, &panel)
}

/// Answers every path without a route.
pub async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}
