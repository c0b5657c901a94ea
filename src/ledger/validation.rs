use crate::errors::{AppError, AppResult};

pub fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

// Blank optional fields are stored as NULL
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn positive_quantity(qty: i64) -> AppResult<i64> {
    if qty <= 0 {
        return Err(AppError::Validation(
            "qty must be a positive integer".to_string(),
        ));
    }
    Ok(qty)
}
