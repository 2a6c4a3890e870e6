//! Input validation helpers
//!
//! Centralized text length constants and field-level checks. Every
//! check runs before any write, so a rejected payload never leaves a
//! partial row behind.

use serde_json::Value;

use crate::utils::AppError;

// ========== Text length limits ==========

/// Entity names: brand, category, model name
pub const MAX_NAME_LEN: usize = 200;

/// Long descriptions
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Image alt text
pub const MAX_ALT_TEXT_LEN: usize = 200;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

pub const MIN_PASSWORD_LEN: usize = 8;

// ========== Validation helpers ==========

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a basic email shape: one `@` with a dot in the domain part.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let Some((local, domain)) = value.split_once('@') else {
        return Err(AppError::validation("email is not a valid address"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::validation("email is not a valid address"));
    }
    Ok(())
}

/// Validate a password before hashing.
pub fn validate_password(value: &str) -> Result<(), AppError> {
    if value.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if value.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN} characters)"
        )));
    }
    Ok(())
}

/// Product specs must be a JSON object; arrays, scalars and null are
/// rejected so the filter layer can always `json_extract` into it.
pub fn validate_specs_object(specs: &Value) -> Result<(), AppError> {
    if !specs.is_object() {
        return Err(AppError::validation("specs must be a JSON object"));
    }
    Ok(())
}

/// Prices are positive integers in minor currency units.
pub fn validate_price(price: i64, field: &str) -> Result<(), AppError> {
    if price <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_text_rejects_empty_and_whitespace() {
        assert!(validate_required_text("", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Lenovo", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn required_text_rejects_over_limit() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user@localhost").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn specs_must_be_object() {
        assert!(validate_specs_object(&json!({"processor": {"model": "i5"}})).is_ok());
        assert!(validate_specs_object(&json!({})).is_ok());
        assert!(validate_specs_object(&json!(["a", "b"])).is_err());
        assert!(validate_specs_object(&json!("text")).is_err());
        assert!(validate_specs_object(&json!(null)).is_err());
    }

    #[test]
    fn price_must_be_positive() {
        assert!(validate_price(0, "price").is_err());
        assert!(validate_price(-5, "price").is_err());
        assert!(validate_price(1, "price").is_ok());
    }
}
