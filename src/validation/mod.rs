pub mod auth;
pub mod product;

use garde::Validate;

use crate::error::{AppError, Result};

/// Runs the `garde` rules of `value` and folds the report into a single
/// `AppError::Validation`.
pub(crate) fn check<T>(value: &T) -> Result<()>
where
    T: Validate,
    T::Context: Default,
{
    value
        .validate()
        .map_err(|report| AppError::Validation(report.to_string().trim().to_string()))
}
