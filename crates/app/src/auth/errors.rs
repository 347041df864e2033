//! Auth service errors.

use std::fmt::Display;

use thiserror::Error;
use tracing::error;

use crate::auth::oauth::FederationError;

/// Outcomes the auth gateway reports to its callers.
///
/// Messages are safe to show to clients. Infrastructure detail is logged where it happens and
/// collapsed into [`AuthServiceError::ServiceUnavailable`].
#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Company already exists")]
    Conflict,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    Unauthenticated,

    #[error("Password not set. Please use GitHub login or contact support.")]
    NoPasswordSet,

    #[error(transparent)]
    Federation(#[from] FederationError),

    #[error("Company not found")]
    NotFound,

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,
}

/// Collapse infrastructure failures into a logged [`AuthServiceError::ServiceUnavailable`].
pub(crate) trait ResultExt<T> {
    fn or_unavailable(self, context: &str) -> Result<T, AuthServiceError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_unavailable(self, context: &str) -> Result<T, AuthServiceError> {
        self.map_err(|source| {
            error!("{context}: {source}");

            AuthServiceError::ServiceUnavailable
        })
    }
}
