//! Input validation helpers
//!
//! Each request type exposes an explicit `validate()` that collects
//! field-level error messages; these are the shared building blocks.
//! Handlers join the collected messages into a single problem detail.

// ── Text length limits ──────────────────────────────────────────────

/// Customer / product / person names
pub const MAX_NAME_LEN: usize = 50;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 15;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Field checks ────────────────────────────────────────────────────

/// Require a non-empty string within the length limit.
pub fn check_required_text(errors: &mut Vec<String>, value: &str, field: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.push(format!("The {field} field is required."));
    } else if value.len() > max_len {
        errors.push(format!(
            "The field {field} must be a string with a maximum length of {max_len}."
        ));
    }
}

/// Require an integer to be at least `min`.
pub fn check_min(errors: &mut Vec<String>, value: i64, field: &str, min: i64) {
    if value < min {
        errors.push(format!(
            "The field {field} must be between {min} and {}.",
            i64::MAX
        ));
    }
}

/// Minimal structural email check: one `@` with something on both sides.
pub fn check_email(errors: &mut Vec<String>, value: &str, field: &str) {
    check_required_text(errors, value, field, MAX_EMAIL_LEN);
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !value.trim().is_empty() && !valid {
        errors.push(format!("The {field} field is not a valid e-mail address."));
    }
}

/// Normalize an email for uniqueness comparison and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
