//! Company Data

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::domain::companies::records::CompanyUuid;

/// New Company Data
#[derive(Clone, PartialEq, Eq)]
pub struct NewCompany {
    /// UUID to assign to the company row.
    pub uuid: CompanyUuid,

    /// Display name to persist.
    pub name: String,

    /// Normalised email.
    pub email: String,

    /// Password digest, `None` for OAuth-provisioned companies.
    pub password_hash: Option<String>,

    /// Initial API key.
    pub api_key: String,

    /// External GitHub account id.
    pub github_id: Option<String>,
}

impl Debug for NewCompany {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NewCompany")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("github_id", &self.github_id)
            .finish_non_exhaustive()
    }
}
