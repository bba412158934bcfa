pub mod admin;
pub mod auth;
pub mod contact;
pub mod flights;
pub mod health;
pub mod radar;
pub mod stats;
pub mod stays;
pub mod users;

use crate::core::{AppError, AppResult};

/// Trims a required text field and enforces a maximum length.
fn required_text(field: &str, value: &str, max_len: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} must not be blank")));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank becomes `None`.
fn optional_text(field: &str, value: Option<String>, max_len: usize) -> AppResult<Option<String>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => required_text(field, trimmed, max_len).map(Some),
    }
}
