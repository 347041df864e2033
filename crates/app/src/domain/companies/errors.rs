//! Companies repository errors.

use sqlx::{Error, error::ErrorKind};
use thiserror::Error;

/// Companies repository error variants.
#[derive(Debug, Error)]
pub enum CompaniesRepositoryError {
    /// A company with the same email (or API key) already exists.
    #[error("company already exists")]
    AlreadyExists,

    /// Company was not found.
    #[error("company not found")]
    NotFound,

    /// Provided data violated a table constraint.
    #[error("invalid data")]
    InvalidData,

    /// Underlying SQL/storage error.
    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CompaniesRepositoryError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(|database| database.kind()) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation | ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
