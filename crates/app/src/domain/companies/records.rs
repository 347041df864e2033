//! Company Records

use std::fmt::{Debug, Formatter, Result as FmtResult};

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Company UUID
pub type CompanyUuid = TypedUuid<CompanyRecord>;

/// Company Record
#[derive(Clone, PartialEq, Eq)]
pub struct CompanyRecord {
    /// Unique company identifier.
    pub uuid: CompanyUuid,

    /// Display name.
    pub name: String,

    /// Normalised login email, unique across all companies.
    pub email: String,

    /// Argon2 PHC digest; absent for accounts provisioned through OAuth.
    pub password_hash: Option<String>,

    /// Current API key.
    pub api_key: String,

    /// Administrative activation flag.
    pub active: bool,

    /// GitHub account id recorded on first OAuth login.
    pub github_id: Option<String>,

    /// Creation timestamp.
    pub created_at: Timestamp,
}

impl CompanyRecord {
    /// Whether this company can sign in with a password.
    #[must_use]
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

impl Debug for CompanyRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CompanyRecord")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "**redacted**"))
            .field("api_key", &"**redacted**")
            .field("active", &self.active)
            .field("github_id", &self.github_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Result of a single-statement API key rotation.
#[derive(Clone, PartialEq, Eq)]
pub struct RotatedApiKey {
    /// Key that was current before the rotation.
    pub previous: String,

    /// Key that is current now.
    pub current: String,
}

impl Debug for RotatedApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("RotatedApiKey(**redacted**)")
    }
}
