//! Request body validation.
//!
//! Validators return [`AppError::InvalidInput`] with a field-qualified message,
//! which the handlers surface verbatim in a 400 envelope.

use crate::types::{AppError, RegisterRequest, Result};

/// Minimum accepted password length for new accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Types that can check their own invariants after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        validate_min_length(&self.password, MIN_PASSWORD_LENGTH, "password")?;
        validate_required(&self.first_name, "firstName")?;
        validate_required(&self.last_name, "lastName")?;
        Ok(())
    }
}

pub fn validate_required(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

pub fn validate_min_length(value: &str, min: usize, field: &str) -> Result<()> {
    if value.chars().count() < min {
        return Err(AppError::InvalidInput(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    Ok(())
}

/// Pragmatic email check: one `@`, non-empty local part without stray dots,
/// dotted domain made of alphanumerics, dots and hyphens.
pub fn validate_email(value: &str) -> Result<()> {
    let invalid = || AppError::InvalidInput("email must be a valid email address".to_string());

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if domain.contains('@') {
        return Err(invalid());
    }

    if local.is_empty()
        || local.len() > 64
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
        || local.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    if domain.is_empty()
        || domain.len() > 255
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || !domain
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(invalid());
    }

    Ok(())
}
