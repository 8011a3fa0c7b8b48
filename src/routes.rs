use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{any, get, post, put},
};
use tower_cookies::CookieManagerLayer;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    handlers::{auth, pages, proxy},
    middleware_layer::{auth::load_session, guard::require_admin},
    state::AppState,
};

/// Builds the CORS layer for the configured origins.
fn cors_layer(state: &AppState) -> anyhow::Result<CorsLayer> {
    let origins = state
        .config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400)))
}

/// Builds the storefront router.
///
/// The returned router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`: the rate limiter
/// on login, register and the proxied `/api/auth/*` routes keys on the peer
/// address.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let auth_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(state.config.auth_rate_limit_period_secs)
            .burst_size(state.config.auth_rate_limit_burst)
            .use_headers()
            .finish()
            .context("Invalid auth rate limit configuration")?,
    );

    let credential_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/api/auth/{*path}", any(proxy::forward))
        .layer(GovernorLayer::new(auth_governor_conf))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/", get(pages::home))
        .route("/products", get(pages::products))
        .route("/products/{id}", get(pages::product_detail))
        .route("/login", get(pages::login_page))
        .route("/register", get(pages::register_page))
        .route("/auth/logout", get(auth::logout).post(auth::logout))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/session", get(auth::session))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/admin", get(pages::admin))
        .route("/admin/products", post(pages::admin_create_product))
        .route(
            "/admin/products/{id}",
            put(pages::admin_update_product).delete(pages::admin_delete_product),
        )
        .route_layer(from_fn(require_admin))
        .with_state(state.clone());

    let proxy_routes = Router::new()
        .route("/api/products", any(proxy::forward))
        .route("/api/products/{*path}", any(proxy::forward))
        .route("/api/categories", any(proxy::forward))
        .route("/api/categories/{*path}", any(proxy::forward))
        .with_state(state.clone());

    let app = Router::new()
        .merge(credential_routes)
        .merge(public_routes)
        .merge(admin_routes)
        .merge(proxy_routes)
        .fallback(pages::not_found)
        .layer(from_fn_with_state(state.clone(), load_session))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors_layer(&state)?);

    Ok(app)
}
