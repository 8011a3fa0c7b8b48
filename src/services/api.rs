use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use http::{Method, StatusCode};
use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use zeroize::Zeroizing;

use crate::error::{AppError, Result};
use crate::services::session::SessionStore;

/// Thin wrapper over `reqwest` that speaks to the remote REST API.
///
/// Every path is appended to the configured base URL. Non-2xx answers are
/// turned into `AppError`s carrying the server's status and message; there
/// is no retry, refresh, or cancellation.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The API base path, e.g. `http://localhost:8080/api`.
    /// * `timeout` - The timeout applied to every request.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ApiClient`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A client that attaches the session's access token to every request.
    pub fn for_session(&self, session: &SessionStore) -> AuthorizedClient {
        AuthorizedClient::new(self.clone(), session.access_token())
    }

    /// A client that attaches `token` (if any) to every request.
    pub fn with_token(&self, token: Option<String>) -> AuthorizedClient {
        AuthorizedClient::new(self.clone(), token)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Encodes `body` as the JSON payload of `builder`.
    pub(crate) fn json_body<B: Serialize>(builder: RequestBuilder, body: &B) -> Result<RequestBuilder> {
        let encoded = sonic_rs::to_string(body)
            .map_err(|e| AppError::Serialization(format!("Request encoding failed: {}", e)))?;
        Ok(builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(encoded))
    }

    /// Sends `builder`, attaching `token` as a bearer credential when present,
    /// and decodes the JSON answer.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        token: Option<&str>,
    ) -> Result<T> {
        let body = self.send_raw(builder, token).await?;
        sonic_rs::from_str(&body)
            .map_err(|e| AppError::Serialization(format!("Response decoding failed: {}", e)))
    }

    /// Like `send`, but an empty body decodes to `T::default()`.
    pub(crate) async fn send_or_default<T: DeserializeOwned + Default>(
        &self,
        builder: RequestBuilder,
        token: Option<&str>,
    ) -> Result<T> {
        let body = self.send_raw(builder, token).await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        sonic_rs::from_str(&body)
            .map_err(|e| AppError::Serialization(format!("Response decoding failed: {}", e)))
    }

    async fn send_raw(&self, builder: RequestBuilder, token: Option<&str>) -> Result<String> {
        let builder = match token {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        };

        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().path().to_string();
        tracing::debug!("➡️ {} {}", method, url);

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::error!("❌ {} {} failed: {}", method, url, e);
            AppError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("❌ {} {} answered {}", method, url, status);
            return Err(AppError::from_response(status, &body));
        }

        tracing::debug!("✅ {} {} answered {}", method, url, status);
        Ok(body)
    }
}

/// An upstream answer relayed verbatim by the proxy.
#[derive(Debug)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ApiClient {
    /// Relays one request to the remote API without interpreting it.
    ///
    /// Non-2xx answers are returned as they are; only transport failures
    /// become errors.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method of the incoming request.
    /// * `path_and_query` - The API path, e.g. `/products/search?keyword=x`.
    /// * `authorization` - The caller's `Authorization` header, if any.
    /// * `content_type` - The caller's `Content-Type` header, if any.
    /// * `body` - The raw request body.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        authorization: Option<&str>,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<ForwardedResponse> {
        let mut builder = self.request(method.clone(), path_and_query);
        if let Some(authorization) = authorization {
            builder = builder.header(http::header::AUTHORIZATION, authorization);
        }
        if let Some(content_type) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        if !body.is_empty() {
            builder = builder.body(body);
        }

        tracing::debug!("↪️ Forwarding {} {}", method, path_and_query);
        let response = builder.send().await.map_err(|e| {
            tracing::error!("❌ Forwarding {} {} failed: {}", method, path_and_query, e);
            AppError::Transport(e)
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }
}

/// An `ApiClient` bound to one caller's access token.
#[derive(Clone)]
pub struct AuthorizedClient {
    api: ApiClient,
    token: Option<Zeroizing<String>>,
}

impl AuthorizedClient {
    fn new(api: ApiClient, token: Option<String>) -> Self {
        Self {
            api,
            token: token.map(Zeroizing::new),
        }
    }

    /// Whether a bearer credential will be attached.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref().map(String::as_str)
    }
}
