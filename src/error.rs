use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The remote API could not be reached or its body could not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote API rejected the credentials (401).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The caller lacks the role required for the operation (403).
    #[error("Authorization failed: {0}")]
    Forbidden(String),

    /// A resource not found error.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error, raised locally or by the remote API.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-2xx answer from the remote API.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Durable session storage could not be written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A body could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error body returned by the remote API. Every field is optional because
/// proxies and gateways in front of it answer with arbitrary bodies.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    validation_errors: Option<BTreeMap<String, String>>,
}

impl AppError {
    /// Classifies a non-2xx response from the remote API.
    ///
    /// # Arguments
    ///
    /// * `status` - The HTTP status returned by the API.
    /// * `body` - The raw response body.
    ///
    /// # Returns
    ///
    /// The matching `AppError` variant, carrying the server's message.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ApiErrorBody = sonic_rs::from_str(body).unwrap_or_default();

        let mut message = parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() || trimmed.starts_with('{') {
                    status
                        .canonical_reason()
                        .unwrap_or("Unexpected response")
                        .to_string()
                } else {
                    trimmed.to_string()
                }
            });

        if let Some(fields) = parsed.validation_errors.filter(|f| !f.is_empty()) {
            let details = fields
                .iter()
                .map(|(field, reason)| format!("{}: {}", field, reason))
                .collect::<Vec<_>>()
                .join(", ");
            message = format!("{} ({})", message, details);
        }

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::Validation(message)
            }
            StatusCode::UNAUTHORIZED => AppError::Authentication(message),
            StatusCode::FORBIDDEN => AppError::Forbidden(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            _ => AppError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Storage(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// A human-readable message suitable for inline display in a view.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Transport(_) => {
                "Unable to reach the server. Please try again.".to_string()
            }
            AppError::Authentication(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg) => msg.clone(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Storage(_) => "Could not save your session.".to_string(),
            AppError::Serialization(_) => "The server sent an unexpected response.".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Whether the remote API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            AppError::Transport(ref e) => {
                tracing::error!("Transport error: {}", e);
            }
            AppError::Authentication(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
            }
            AppError::Forbidden(ref msg) => {
                tracing::warn!("Authorization failed: {}", msg);
            }
            AppError::NotFound(ref msg) => {
                tracing::debug!("Resource not found: {}", msg);
            }
            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
            }
            AppError::Api { status, ref message } => {
                tracing::warn!("API error {}: {}", status, message);
            }
            AppError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
            }
            AppError::Serialization(ref msg) => {
                tracing::error!("Serialization error: {}", msg);
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
            }
        }

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": self.user_message()
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
