//! Common validation rules shared across request payloads.

use validator::ValidationError;

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a normalized (trimmed, lowercased) email address.
///
/// Requirements:
/// - Non-empty
/// - Contains an `@`
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || !email.contains('@') {
        return Err(rule_error("email_invalid", "Invalid email address"));
    }
    Ok(())
}

/// Validates a product name: must be non-empty after trimming.
pub fn validate_product_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(rule_error("product_name_empty", "Product name is required"));
    }
    Ok(())
}

/// Validates a product amount: must be a finite number.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        return Err(rule_error("amount_not_finite", "Valid amount is required"));
    }
    Ok(())
}
