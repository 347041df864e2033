//! Session response models.

use keyhold_app::{auth::SessionGrant, domain::companies::records::CompanyRecord};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Company fields returned with a fresh session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionCompany {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub api_key: String,
}

impl From<CompanyRecord> for SessionCompany {
    fn from(company: CompanyRecord) -> Self {
        Self {
            id: company.uuid.into_uuid(),
            name: company.name,
            email: company.email,
            api_key: company.api_key,
        }
    }
}

/// Session Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    pub message: String,
    pub company: SessionCompany,

    /// Bearer token for authenticated routes
    pub token: String,
}

impl SessionResponse {
    pub(crate) fn new(message: &str, grant: SessionGrant) -> Self {
        Self {
            message: message.to_string(),
            company: grant.company.into(),
            token: grant.token,
        }
    }
}
