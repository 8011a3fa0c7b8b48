use crate::error::{AppError, Result};
use crate::models::product::ProductForm;

/// Validates the required fields of the admin product form.
pub fn validate_product_form(form: &ProductForm) -> Result<()> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    super::check(form)
}
