use crate::error::{AppError, Result};
use crate::models::user::{LoginRequest, RegisterRequest};

/// Validates a login form before it is sent to the API.
///
/// # Arguments
///
/// * `request` - The login form.
///
/// # Returns
///
/// A `Result<()>` indicating whether the form is complete.
pub fn validate_login(request: &LoginRequest) -> Result<()> {
    if request.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }

    if request.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    super::check(request)
}

/// Validates a registration form before it is sent to the API.
///
/// # Arguments
///
/// * `request` - The registration form.
///
/// # Returns
///
/// A `Result<()>` indicating whether every field is filled in.
pub fn validate_register(request: &RegisterRequest) -> Result<()> {
    if request.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }

    if request.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    if request.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    super::check(request)
}
