use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use anyhow::{Context, Result};

/// Default base path of the remote REST API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL every remote API path is appended to.
    pub api_base_url: String,
    /// Address the storefront listens on.
    pub server_addr: SocketAddr,
    /// Timeout applied to each outbound API request, in seconds.
    pub api_timeout_secs: u64,
    /// The lifetime of the session cookies in days.
    pub session_duration_days: i64,
    /// Whether session cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
    /// Burst size of the login/register rate limiter.
    pub auth_rate_limit_burst: u32,
    /// Seconds after which one login/register slot is replenished.
    pub auth_rate_limit_period_secs: u64,
}

impl Config {
    /// Creates a `Config` pointing at `api_base_url` with every other
    /// setting at its default.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            server_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_timeout_secs: 10,
            session_duration_days: 7,
            secure_cookies: false,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            auth_rate_limit_burst: 10,
            auth_rate_limit_period_secs: 2,
        }
    }

    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::new(DEFAULT_API_BASE_URL);

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            anyhow::bail!("API_BASE_URL must be an http(s) URL, got '{}'", api_base_url);
        }

        let allowed_origins = match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.allowed_origins.clone(),
        };

        Ok(Self {
            api_base_url,
            server_addr: env::var("SERVER_ADDR")
                .unwrap_or_else(|_| defaults.server_addr.to_string())
                .parse()
                .context("Invalid SERVER_ADDR")?,
            api_timeout_secs: env::var("API_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.api_timeout_secs.to_string())
                .parse()
                .context("Invalid API_TIMEOUT_SECS")?,
            session_duration_days: env::var("SESSION_DURATION_DAYS")
                .unwrap_or_else(|_| defaults.session_duration_days.to_string())
                .parse()
                .context("Invalid SESSION_DURATION_DAYS")?,
            secure_cookies: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string())
                == "production",
            allowed_origins,
            auth_rate_limit_burst: env::var("AUTH_RATE_LIMIT_BURST")
                .unwrap_or_else(|_| defaults.auth_rate_limit_burst.to_string())
                .parse()
                .context("Invalid AUTH_RATE_LIMIT_BURST")?,
            auth_rate_limit_period_secs: env::var("AUTH_RATE_LIMIT_PERIOD_SECS")
                .unwrap_or_else(|_| defaults.auth_rate_limit_period_secs.to_string())
                .parse()
                .context("Invalid AUTH_RATE_LIMIT_PERIOD_SECS")?,
        })
    }

    /// Outbound request timeout.
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }
}
