use async_trait::async_trait;
use http::Method;

use crate::error::Result;
use crate::models::user::{
    AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest,
};
use crate::services::api::ApiClient;

/// The authentication endpoints of the remote API.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login`.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse>;

    /// `POST /auth/register`.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse>;

    /// `POST /auth/refresh`.
    async fn refresh(&self, request: &RefreshTokenRequest) -> Result<AuthResponse>;

    /// `POST /auth/forgot-password?email=`.
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        tracing::info!("🔐 Sending login request for user: {}", request.username);
        let builder = ApiClient::json_body(self.request(Method::POST, "/auth/login"), request)?;
        self.send(builder, None).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        tracing::info!("📝 Sending register request for user: {}", request.username);
        let builder = ApiClient::json_body(self.request(Method::POST, "/auth/register"), request)?;
        self.send(builder, None).await
    }

    async fn refresh(&self, request: &RefreshTokenRequest) -> Result<AuthResponse> {
        tracing::info!("🔄 Sending refresh token request");
        let builder = ApiClient::json_body(self.request(Method::POST, "/auth/refresh"), request)?;
        self.send(builder, None).await
    }

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        tracing::info!("📧 Sending forgot password request for: {}", email);
        let builder = self
            .request(Method::POST, "/auth/forgot-password")
            .query(&[("email", email)]);
        self.send_or_default(builder, None).await
    }
}
