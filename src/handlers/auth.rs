use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{
        session::SessionSnapshot,
        user::{LoginRequest, MessageResponse, RegisterRequest},
    },
    services::{auth::AuthApi, session::SessionStore},
    state::AppState,
    views::navbar::NavbarView,
};

/// The response payload for the session lifecycle endpoints.
#[derive(Serialize)]
pub struct AuthResult {
    pub success: bool,
    pub message: String,
    pub session: SessionSnapshot,
}

/// The current session together with the navigation bar it produces.
#[derive(Serialize)]
pub struct SessionView {
    pub session: SessionSnapshot,
    pub navbar: NavbarView,
}

/// Query string of `POST /auth/forgot-password`.
#[derive(Deserialize, Debug)]
pub struct ForgotPasswordQuery {
    pub email: String,
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<SessionStore>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResult>> {
    tracing::info!("🔐 Login attempt for user: {}", payload.username);

    let response = session
        .login(&state.api, &payload.username, &payload.password)
        .await?;

    Ok(Json(AuthResult {
        success: true,
        message: format!("Welcome back, {}!", response.username),
        session: session.snapshot(),
    }))
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Extension(session): Extension<SessionStore>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response> {
    tracing::info!("📝 Register attempt for user: {}", payload.username);

    session
        .register(&state.api, &payload.username, &payload.email, &payload.password)
        .await?;

    let body = AuthResult {
        success: true,
        message: "Registration successful. Welcome!".to_string(),
        session: session.snapshot(),
    };

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// Handles user logout and returns to the home page.
#[axum::debug_handler]
pub async fn logout(Extension(session): Extension<SessionStore>) -> Redirect {
    session.logout();
    Redirect::to("/")
}

/// Exchanges the stored refresh token for a new token pair.
#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    Extension(session): Extension<SessionStore>,
) -> Result<Json<AuthResult>> {
    session.refresh(&state.api).await?;

    Ok(Json(AuthResult {
        success: true,
        message: "Session refreshed".to_string(),
        session: session.snapshot(),
    }))
}

/// Starts password recovery for `email`.
#[axum::debug_handler]
pub async fn forgot_password(
    State(state): State<AppState>,
    Query(query): Query<ForgotPasswordQuery>,
) -> Result<Json<MessageResponse>> {
    let response = state.api.forgot_password(query.email.trim()).await?;
    Ok(Json(response))
}

/// Returns the current session and the navigation bar.
#[axum::debug_handler]
pub async fn session(Extension(session): Extension<SessionStore>) -> Json<SessionView> {
    Json(SessionView {
        navbar: NavbarView::from_session(&session),
        session: session.snapshot(),
    })
}
