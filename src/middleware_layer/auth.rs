use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    services::session::SessionStore,
    state::AppState,
    storage::CookieStorage,
};

/// A middleware that restores the caller's session from its cookies.
///
/// The hydrated `SessionStore` is inserted as a request extension so that
/// guards and handlers share one handle. Writes made through it become
/// `Set-Cookie` headers on the response.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn load_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let storage = CookieStorage::new(cookies, state.cookie_settings());
    let session = SessionStore::hydrated(Arc::new(storage));

    match session.user() {
        Some(user) => tracing::debug!("🔑 Session found for user: {}", user.username),
        None => tracing::debug!("🔑 Anonymous request"),
    }

    request.extensions_mut().insert(session);
    next.run(request).await
}
