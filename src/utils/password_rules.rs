// utils/password_rules.rs

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during password policy checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {0} characters long")]
    TooShort(usize),
    #[error("Password must contain at least one uppercase letter")]
    NoUppercase,
    #[error("Password must contain at least one lowercase letter")]
    NoLowercase,
    #[error("Password must contain at least one digit")]
    NoDigit,
}

static CHARACTER_RULES: Lazy<[(Regex, PasswordPolicyError); 3]> = Lazy::new(|| {
    [
        (
            Regex::new(r"[A-Z]").unwrap(),
            PasswordPolicyError::NoUppercase,
        ),
        (
            Regex::new(r"[a-z]").unwrap(),
            PasswordPolicyError::NoLowercase,
        ),
        (Regex::new(r"\d").unwrap(), PasswordPolicyError::NoDigit),
    ]
});

/// Client-side preflight of the registration password. The backend makes
/// the final call; this only spares the user a round trip.
pub struct PasswordPolicy {
    min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Checks a password and reports the first rule it breaks.
    pub fn check(&self, password: &str) -> Result<(), PasswordPolicyError> {
        if password.len() < self.min_length {
            return Err(PasswordPolicyError::TooShort(self.min_length));
        }
        for (pattern, violation) in CHARACTER_RULES.iter() {
            if !pattern.is_match(password) {
                return Err(violation.clone());
            }
        }
        Ok(())
    }

    pub fn is_acceptable(password: &str) -> bool {
        Self::default().check(password).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_conforming_password() {
        assert!(PasswordPolicy::is_acceptable("TestPass123"));
    }

    #[test]
    fn reports_the_first_broken_rule() {
        assert_eq!(
            PasswordPolicy::default().check("short1A"),
            Err(PasswordPolicyError::TooShort(8))
        );
        assert_eq!(
            PasswordPolicy::default().check("alllowercase1"),
            Err(PasswordPolicyError::NoUppercase)
        );
        assert_eq!(
            PasswordPolicy::default().check("NoDigitsHere"),
            Err(PasswordPolicyError::NoDigit)
        );
    }
}
