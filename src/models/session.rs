use serde::Serialize;

use crate::models::user::UserProfile;

/// Storage key of the access token entry.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key of the refresh token entry.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key of the serialized profile entry.
pub const USER_KEY: &str = "user";

/// Every key the session store owns.
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

/// Read-only snapshot of a session, safe to hand to views and responses.
///
/// Tokens are deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub loading: bool,
    pub authenticated: bool,
    pub admin: bool,
    pub user: Option<UserProfile>,
}
