use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{HeaderValue, Response, header},
    response::IntoResponse,
};

use crate::{
    error::{AppError, Result},
    services::session::SessionStore,
    state::AppState,
};

/// Largest request body relayed to the remote API.
pub const MAX_PROXY_BODY_BYTES: usize = 1024 * 1024;

/// Prefix stripped from incoming paths before they are relayed.
const PROXY_PREFIX: &str = "/api";

/// Relays `/api/...` to the remote API under the same path.
///
/// The caller's `Authorization` header is forwarded unchanged. Without one,
/// the access token of the caller's session is used instead. The upstream
/// status and body are returned as they are.
#[axum::debug_handler]
pub async fn forward(State(state): State<AppState>, request: Request) -> Result<impl IntoResponse> {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());
    let upstream_path = path_and_query
        .strip_prefix(PROXY_PREFIX)
        .ok_or_else(|| AppError::NotFound(format!("No proxy route for {}", parts.uri.path())))?;

    let session_token = parts
        .extensions
        .get::<SessionStore>()
        .and_then(SessionStore::access_token)
        .map(|token| format!("Bearer {}", token));
    let authorization = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or(session_token);
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let body = to_bytes(body, MAX_PROXY_BODY_BYTES)
        .await
        .map_err(|e| AppError::Validation(format!("Request body rejected: {}", e)))?;

    let forwarded = state
        .api
        .forward(
            parts.method.clone(),
            upstream_path,
            authorization.as_deref(),
            content_type,
            body,
        )
        .await?;

    tracing::debug!(
        "↩️ {} {} relayed with status {}",
        parts.method,
        upstream_path,
        forwarded.status
    );

    let mut response = Response::new(Body::from(forwarded.body));
    *response.status_mut() = forwarded.status;
    if let Some(content_type) = forwarded
        .content_type
        .and_then(|value| HeaderValue::from_str(&value).ok())
    {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }

    Ok(response)
}
