//! Auth request and response models.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::domain::companies::records::CompanyRecord;

/// Password registration input.
#[derive(Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Password login input.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Password change input.
#[derive(Clone)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// A company together with a freshly issued session token.
#[derive(Clone)]
pub struct SessionGrant {
    pub company: CompanyRecord,
    pub token: String,
}

impl Debug for Registration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .field("name", &self.name)
            .finish()
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

impl Debug for PasswordChange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("PasswordChange(**redacted**)")
    }
}

impl Debug for SessionGrant {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SessionGrant")
            .field("company", &self.company)
            .field("token", &"**redacted**")
            .finish()
    }
}
