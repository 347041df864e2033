//! Input shape checks applied before any store access.

use std::sync::LazyLock;

use regex::Regex;

use crate::auth::AuthServiceError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

pub(crate) fn require(value: &str, message: &'static str) -> Result<(), AuthServiceError> {
    if value.trim().is_empty() {
        return Err(AuthServiceError::Validation(message));
    }

    Ok(())
}

pub(crate) fn email_shape(email: &str) -> Result<(), AuthServiceError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(AuthServiceError::Validation("Invalid email format"));
    }

    Ok(())
}

pub(crate) fn password_length(password: &str) -> Result<(), AuthServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthServiceError::Validation(
            "Password must be at least 6 characters",
        ));
    }

    Ok(())
}
