use garde::Validate;
use serde::{Deserialize, Serialize};

/// Role tag the remote API assigns to administrators.
pub const ADMIN_ROLE: &str = "ROLE_ADMIN";

/// Role tag the remote API assigns to regular customers.
pub const USER_ROLE: &str = "ROLE_USER";

/// The profile cached for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's username.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// The user's role tag, e.g. `ROLE_ADMIN`.
    pub role: String,
}

impl UserProfile {
    /// Whether the role equals `role` exactly.
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    /// The role without its `ROLE_` prefix, as shown next to the username.
    pub fn display_role(&self) -> &str {
        self.role.strip_prefix("ROLE_").unwrap_or(&self.role)
    }
}

/// The payload returned by the login, register and refresh endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub role: String,
}

impl AuthResponse {
    /// The profile derived from the payload.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// The request payload for user login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[garde(length(min = 1))]
    pub username: String,
    #[garde(length(min = 1))]
    pub password: String,
}

/// The request payload for user registration.
///
/// Only presence is checked here; length, charset and email format rules
/// belong to the remote API.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[garde(length(min = 1))]
    pub username: String,
    #[garde(length(min = 1))]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

/// The request payload for exchanging a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// A plain `{ "message": ... }` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
