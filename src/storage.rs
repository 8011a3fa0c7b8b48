//! Durable string entries backing the session store.
//!
//! Entries are plain strings keyed by name, the same contract a browser's
//! local storage offers. The storefront keeps them in cookies; tests and
//! embedders can keep them in memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use tower_cookies::cookie::{SameSite, time::Duration};
use tower_cookies::{Cookie, Cookies};

use crate::error::{AppError, Result};

/// A key/value store of strings that outlives a single view.
pub trait DurableStorage: Send + Sync {
    /// Returns the entry stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the entry stored under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local storage, shared between clones.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty `MemoryStorage`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Attributes applied to every session cookie.
#[derive(Clone, Debug)]
pub struct CookieSettings {
    /// The lifetime of the cookie in days.
    pub max_age_days: i64,
    /// Whether the cookie is only sent over HTTPS.
    pub secure: bool,
}

/// Storage backed by the request's cookie jar.
///
/// Values are base64url-encoded so that serialized JSON survives the cookie
/// value grammar. Writes become `Set-Cookie` headers on the response and are
/// visible to later reads within the same request.
#[derive(Clone)]
pub struct CookieStorage {
    cookies: Cookies,
    settings: CookieSettings,
}

impl CookieStorage {
    /// Creates a new `CookieStorage` over the request's cookies.
    pub fn new(cookies: Cookies, settings: CookieSettings) -> Self {
        Self { cookies, settings }
    }

    fn build_cookie(&self, name: &str, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(name.to_string(), value);

        cookie.set_http_only(true);
        if self.settings.secure {
            cookie.set_secure(true);
        }
        cookie.set_same_site(SameSite::Lax);
        cookie.set_max_age(Duration::seconds(self.settings.max_age_days * 86400));
        cookie.set_path("/");

        cookie
    }
}

impl DurableStorage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        let cookie = self.cookies.get(key)?;
        let bytes = match URL_SAFE_NO_PAD.decode(cookie.value()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("❌ Cookie '{}' is not valid base64: {}", key, e);
                return None;
            }
        };
        match String::from_utf8(bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("❌ Cookie '{}' is not valid UTF-8: {}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(AppError::Storage("Cookie name cannot be empty".to_string()));
        }
        let encoded = URL_SAFE_NO_PAD.encode(value.as_bytes());
        self.cookies.add(self.build_cookie(key, encoded));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut cookie = Cookie::new(key.to_string(), "");
        cookie.set_max_age(Duration::seconds(0));
        cookie.set_path("/");
        self.cookies.remove(cookie);
        Ok(())
    }
}
