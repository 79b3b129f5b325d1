//! Password hashing and the account password policy.
//!
//! Hashing uses bcrypt at [`bcrypt::DEFAULT_COST`]. The policy is enforced before
//! any store access on every path that sets a password (registration, admin
//! user creation, profile update, password reset, CLI bootstrap).

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

/// Symbols a password may (and must, at least once) contain.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

/// At least eight characters with a lowercase letter, an uppercase letter, a digit
/// and a symbol from [`PASSWORD_SYMBOLS`]; nothing outside letters, digits and
/// those symbols.
pub fn is_strong_password(password: &str) -> bool {
    let is_symbol = |c: char| PASSWORD_SYMBOLS.contains(c);

    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(is_symbol)
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || is_symbol(c))
}

pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if is_strong_password(password) {
        Ok(())
    } else {
        Err(AppError::bad_request("Password is invalid"))
    }
}
