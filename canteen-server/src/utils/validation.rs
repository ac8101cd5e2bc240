//! Input validation helpers
//!
//! Centralized boundary validation: text lengths, quantities, money amounts.
//! Everything past these helpers works on validated values.

use shared::{AppError, AppResult};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: items, modifiers, options, companies
pub const MAX_NAME_LEN: usize = 200;

/// Free-form notes (message to kitchen)
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!(
            "Invalid or missing string for field: {field}"
        )));
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
) -> AppResult<()> {
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

/// Validate a positive integer quantity.
pub fn validate_quantity(value: i64, field: &str) -> AppResult<u32> {
    if value < 1 {
        return Err(AppError::validation(format!(
            "Value for field {field} must be at least 1"
        )));
    }
    u32::try_from(value)
        .map_err(|_| AppError::validation(format!("Value for field {field} is out of range")))
}

/// Validate a non-negative, finite money amount.
pub fn validate_non_negative_money(value: f64, field: &str) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "Invalid number for field: {field}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "Value for field {field} must be non-negative"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("acme", "tenantId", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("  ", "tenantId", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(MAX_NAME_LEN + 1), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("ok".into()), "note", MAX_NOTE_LEN).is_ok());
        let long = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert!(validate_optional_text(&long, "note", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_quantity() {
        assert_eq!(validate_quantity(1, "item.quantity").unwrap(), 1);
        assert_eq!(validate_quantity(40, "item.quantity").unwrap(), 40);
        assert!(validate_quantity(0, "item.quantity").is_err());
        assert!(validate_quantity(-3, "item.quantity").is_err());
    }

    #[test]
    fn test_money() {
        assert_eq!(validate_non_negative_money(0.0, "tip").unwrap(), 0.0);
        assert_eq!(validate_non_negative_money(3.5, "tip").unwrap(), 3.5);
        assert!(validate_non_negative_money(-0.01, "tip").is_err());
        assert!(validate_non_negative_money(f64::NAN, "tip").is_err());
        assert!(validate_non_negative_money(f64::INFINITY, "tip").is_err());
    }
}
