//! Route guard: decides between rendering, redirecting to the login page,
//! and the access-denied view.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::models::user::ADMIN_ROLE;
use crate::services::session::SessionStore;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

pub const ACCESS_DENIED_TITLE: &str = "Access Denied";
pub const ACCESS_DENIED_MESSAGE: &str = "You do not have permission to access this page.";

/// Outcome of evaluating a guard against a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session has not been hydrated yet.
    Loading,
    /// Nobody is signed in.
    RedirectToLogin,
    /// Signed in, but the role does not match.
    AccessDenied,
    /// The wrapped content may be shown.
    Render,
}

/// Wraps content that requires a signed-in user, optionally with a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGuard {
    pub required_role: Option<String>,
}

impl RouteGuard {
    /// A guard that only requires a signed-in user.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// A guard that requires the role `role` exactly.
    pub fn with_role(role: &str) -> Self {
        Self {
            required_role: Some(role.to_string()),
        }
    }

    /// Evaluates the guard against `session`.
    pub fn evaluate(&self, session: &SessionStore) -> GuardDecision {
        if session.is_loading() {
            return GuardDecision::Loading;
        }
        if !session.is_authenticated() {
            return GuardDecision::RedirectToLogin;
        }
        match &self.required_role {
            Some(role) if !session.has_role(role) => GuardDecision::AccessDenied,
            _ => GuardDecision::Render,
        }
    }
}

impl GuardDecision {
    /// The response that replaces the content, or `None` when the content
    /// should be rendered.
    pub fn response(self) -> Option<Response> {
        match self {
            GuardDecision::Render => None,
            GuardDecision::Loading => Some(
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    [(http::header::CONTENT_TYPE, "application/json")],
                    r#"{"loading":true}"#,
                )
                    .into_response(),
            ),
            GuardDecision::RedirectToLogin => Some(Redirect::to(LOGIN_PATH).into_response()),
            GuardDecision::AccessDenied => Some(access_denied()),
        }
    }
}

/// The access-denied view.
pub fn access_denied() -> Response {
    let body = sonic_rs::to_string(&sonic_rs::json!({
        "title": ACCESS_DENIED_TITLE,
        "message": ACCESS_DENIED_MESSAGE,
    }))
    .unwrap_or_default();

    (
        StatusCode::FORBIDDEN,
        [(http::header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

async fn enforce(guard: RouteGuard, request: Request<Body>, next: Next) -> Response {
    tracing::debug!("🔐 Checking route guard...");

    let Some(session) = request.extensions().get::<SessionStore>().cloned() else {
        tracing::error!("❌ Route guard reached without a session; is load_session installed?");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let decision = guard.evaluate(&session);
    match decision.response() {
        Some(response) => {
            tracing::warn!("❌ Route guard blocked {}: {:?}", request.uri().path(), decision);
            response
        }
        None => {
            tracing::debug!("✅ Route guard passed");
            next.run(request).await
        }
    }
}

/// A middleware that requires a signed-in user.
pub async fn require_auth(request: Request<Body>, next: Next) -> Response {
    enforce(RouteGuard::authenticated(), request, next).await
}

/// A middleware that requires a signed-in administrator.
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    enforce(RouteGuard::with_role(ADMIN_ROLE), request, next).await
}
