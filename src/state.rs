use crate::config::Config;
use crate::error::Result;
use crate::services::api::ApiClient;
use crate::storage::CookieSettings;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The shared client for the remote REST API.
    pub api: ApiClient,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::new(&config.api_base_url, config.api_timeout())?;
        tracing::info!(
            "✅ API client initialized for {} (timeout {}s)",
            api.base_url(),
            config.api_timeout_secs
        );

        Ok(AppState {
            config: config.clone(),
            api,
        })
    }

    /// Attributes of the session cookies.
    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings {
            max_age_days: self.config.session_duration_days,
            secure: self.config.secure_cookies,
        }
    }
}
