//! Password hashing and policy
//!
//! Argon2 hashing plus the configurable registration password policy:
//! minimum length, required lowercase, required digit. Uppercase and
//! special characters are deliberately not required.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash. Malformed hashes verify as false
/// rather than erroring, so callers fail closed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Registration password policy
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_lowercase: bool,
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 5,
            require_lowercase: true,
            require_digit: true,
        }
    }
}

impl PasswordPolicy {
    /// Collect every violated rule as a separate message.
    pub fn check(&self, password: &str) -> Vec<String> {
        let mut errors = Vec::new();

        if password.len() < self.min_length {
            errors.push(format!(
                "Passwords must be at least {} characters.",
                self.min_length
            ));
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            errors.push("Passwords must have at least one lowercase ('a'-'z').".to_string());
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Passwords must have at least one digit ('0'-'9').".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("secret1").expect("hashing failed");
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("secret1", "not-a-phc-string"));
    }

    #[test]
    fn test_policy_collects_all_violations() {
        let policy = PasswordPolicy::default();

        let errors = policy.check("AB1");
        assert_eq!(errors.len(), 2); // too short, no lowercase

        let errors = policy.check("abcdef");
        assert_eq!(errors.len(), 1); // no digit

        assert!(policy.check("abc12").is_empty());
    }

    #[test]
    fn test_policy_does_not_require_uppercase_or_special() {
        let policy = PasswordPolicy::default();
        assert!(policy.check("plain5").is_empty());
    }
}
