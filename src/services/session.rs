use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use zeroize::Zeroizing;

use crate::error::{AppError, Result};
use crate::models::session::{
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS, SessionSnapshot, USER_KEY,
};
use crate::models::user::{
    ADMIN_ROLE, AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, UserProfile,
};
use crate::services::auth::AuthApi;
use crate::storage::DurableStorage;
use crate::validation::auth::{validate_login, validate_register};

#[derive(Default)]
struct SessionState {
    profile: Option<UserProfile>,
    access_token: Option<Zeroizing<String>>,
    refresh_token: Option<Zeroizing<String>>,
    loading: bool,
}

impl SessionState {
    fn clear(&mut self) {
        self.profile = None;
        self.access_token = None;
        self.refresh_token = None;
    }
}

/// The signed-in user's identity and credentials.
///
/// The store owns the session; durable storage is a mirror of it, written on
/// every lifecycle change and read only by `hydrate`. Clones share state, so
/// a handle can be passed to every consumer that needs the session.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    storage: Arc<dyn DurableStorage>,
}

impl SessionStore {
    /// Creates a store over `storage`. The store reports `loading` until
    /// `hydrate` runs.
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                loading: true,
                ..SessionState::default()
            })),
            storage,
        }
    }

    /// Creates a store and hydrates it immediately.
    pub fn hydrated(storage: Arc<dyn DurableStorage>) -> Self {
        let store = Self::new(storage);
        store.hydrate();
        store
    }

    /// Loads the session persisted in durable storage.
    ///
    /// A profile is only adopted together with an access token; a profile
    /// that cannot be decoded counts as absent.
    pub fn hydrate(&self) {
        let access_token = self.storage.get(ACCESS_TOKEN_KEY);
        let refresh_token = self.storage.get(REFRESH_TOKEN_KEY);
        let profile = self.storage.get(USER_KEY).and_then(|raw| {
            sonic_rs::from_str::<UserProfile>(&raw)
                .map_err(|e| tracing::warn!("❌ Stored profile is not valid JSON: {}", e))
                .ok()
        });

        let mut state = self.write();
        match (profile, access_token) {
            (Some(profile), Some(access_token)) => {
                tracing::debug!("✅ Session restored for user: {}", profile.username);
                state.profile = Some(profile);
                state.access_token = Some(Zeroizing::new(access_token));
                state.refresh_token = refresh_token.map(Zeroizing::new);
            }
            _ => state.clear(),
        }
        state.loading = false;
    }

    /// Signs in with `username` and `password`.
    ///
    /// # Arguments
    ///
    /// * `api` - The authentication endpoints.
    /// * `username` - The user's username.
    /// * `password` - The user's password.
    ///
    /// # Returns
    ///
    /// A `Result` containing the raw `AuthResponse`. API failures such as
    /// invalid credentials are propagated unchanged and leave the session
    /// untouched.
    pub async fn login<A>(&self, api: &A, username: &str, password: &str) -> Result<AuthResponse>
    where
        A: AuthApi + ?Sized,
    {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        validate_login(&request)?;

        let response = api.login(&request).await?;
        self.establish(&response)?;
        tracing::info!("✅ User logged in: {}", response.username);
        Ok(response)
    }

    /// Creates an account and signs in with it.
    ///
    /// # Arguments
    ///
    /// * `api` - The authentication endpoints.
    /// * `username` - The new username.
    /// * `email` - The new user's email address.
    /// * `password` - The new user's password.
    ///
    /// # Returns
    ///
    /// A `Result` containing the raw `AuthResponse`.
    pub async fn register<A>(
        &self,
        api: &A,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse>
    where
        A: AuthApi + ?Sized,
    {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        validate_register(&request)?;

        let response = api.register(&request).await?;
        self.establish(&response)?;
        tracing::info!("✅ User registered: {}", response.username);
        Ok(response)
    }

    /// Exchanges the stored refresh token for a new token pair.
    ///
    /// Never called implicitly; an expired access token is only replaced
    /// when a caller asks for it.
    pub async fn refresh<A>(&self, api: &A) -> Result<AuthResponse>
    where
        A: AuthApi + ?Sized,
    {
        let refresh_token = self
            .read()
            .refresh_token
            .as_ref()
            .map(|token| token.to_string())
            .ok_or_else(|| AppError::Authentication("No refresh token available".to_string()))?;

        let response = api.refresh(&RefreshTokenRequest { refresh_token }).await?;
        self.establish(&response)?;
        tracing::info!("✅ Tokens refreshed for user: {}", response.username);
        Ok(response)
    }

    /// Ends the session. Clears memory and every persisted entry; never fails.
    pub fn logout(&self) {
        let username = {
            let mut state = self.write();
            let username = state.profile.as_ref().map(|p| p.username.clone());
            state.clear();
            state.loading = false;
            username
        };

        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!("❌ Failed to remove session entry '{}': {}", key, e);
            }
        }

        match username {
            Some(username) => tracing::info!("👋 User logged out: {}", username),
            None => tracing::debug!("👋 Logout without an active session"),
        }
    }

    /// Whether both a profile and an access token are present.
    pub fn is_authenticated(&self) -> bool {
        let state = self.read();
        state.profile.is_some() && state.access_token.is_some()
    }

    /// Whether the profile's role is exactly the administrator role.
    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    /// Whether the profile's role is exactly `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.read()
            .profile
            .as_ref()
            .is_some_and(|profile| profile.has_role(role))
    }

    /// Whether hydration has not run yet.
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// The signed-in user's profile.
    pub fn user(&self) -> Option<UserProfile> {
        self.read().profile.clone()
    }

    /// The access token attached to outgoing requests.
    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.as_ref().map(|token| token.to_string())
    }

    /// A token-free snapshot for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            loading: self.is_loading(),
            authenticated: self.is_authenticated(),
            admin: self.is_admin(),
            user: self.user(),
        }
    }

    /// Persists `response` and adopts it as the current session.
    ///
    /// All three entries are written or none are: a failed write removes the
    /// entries written so far and leaves the store signed out.
    fn establish(&self, response: &AuthResponse) -> Result<()> {
        let profile = response.profile();
        let profile_json = sonic_rs::to_string(&profile)
            .map_err(|e| AppError::Serialization(format!("Profile serialization failed: {}", e)))?;

        let entries = [
            (ACCESS_TOKEN_KEY, response.access_token.as_str()),
            (REFRESH_TOKEN_KEY, response.refresh_token.as_str()),
            (USER_KEY, profile_json.as_str()),
        ];

        for (written, (key, value)) in entries.iter().enumerate() {
            if let Err(e) = self.storage.set(key, value) {
                tracing::error!("❌ Failed to persist session entry '{}': {}", key, e);
                for (rollback_key, _) in &entries[..written] {
                    let _ = self.storage.remove(rollback_key);
                }
                let mut state = self.write();
                state.clear();
                state.loading = false;
                return Err(AppError::Storage(format!(
                    "Failed to persist session entry '{}'",
                    key
                )));
            }
        }

        let mut state = self.write();
        state.profile = Some(profile);
        state.access_token = Some(Zeroizing::new(response.access_token.clone()));
        state.refresh_token = Some(Zeroizing::new(response.refresh_token.clone()));
        state.loading = false;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
