//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on reasonable UX limits for names, notes,
//! descriptions; the embedded database has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: cake, size, flavor, layer, category, promo description, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, design briefs (order note, admin note, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Chat message body
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Short identifiers: phone, promo code, M-Pesa receipt code, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

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

// ── Normalization helpers ───────────────────────────────────────────

/// 邮箱归一化：trim + 小写
///
/// 用作留言会话 key 和优惠码的大小写无关匹配同一套约定。
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 优惠码归一化：trim + 大写
///
/// 优惠码存储为大写，校验时先归一化输入，实现大小写无关匹配。
pub fn normalize_promo_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Validate a monetary amount is finite and non-negative.
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Chocolate Fudge", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn required_text_rejects_overlong() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn promo_code_normalization_is_case_insensitive() {
        assert_eq!(normalize_promo_code(" save10 "), "SAVE10");
        assert_eq!(
            normalize_promo_code("save10"),
            normalize_promo_code("SAVE10")
        );
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email(" Amina@Example.COM "), "amina@example.com");
    }

    #[test]
    fn amount_validation() {
        assert!(validate_amount(0.0, "price").is_ok());
        assert!(validate_amount(-1.0, "price").is_err());
        assert!(validate_amount(f64::NAN, "price").is_err());
    }
}
