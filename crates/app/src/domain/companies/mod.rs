//! Companies
//!
//! The `companies` table is the only durable state: identity, password digest, API key and
//! activation flag for every tenant.

pub mod data;
pub mod errors;
pub mod records;
mod repository;

pub use errors::CompaniesRepositoryError;
pub use repository::*;

/// Canonical form of an email address for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
