//! Company Models

use keyhold_app::domain::companies::records::CompanyRecord;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated company, as shown on its dashboard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DashboardCompany {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub api_key: String,
    pub active: bool,

    /// RFC 3339 creation time
    pub created_at: String,
}

impl From<CompanyRecord> for DashboardCompany {
    fn from(company: CompanyRecord) -> Self {
        Self {
            id: company.uuid.into_uuid(),
            name: company.name,
            email: company.email,
            api_key: company.api_key,
            active: company.active,
            created_at: company.created_at.to_string(),
        }
    }
}

/// A company in the directory listing. Never carries secrets.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompanyListing {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub created_at: String,
}

impl From<CompanyRecord> for CompanyListing {
    fn from(company: CompanyRecord) -> Self {
        Self {
            id: company.uuid.into_uuid(),
            name: company.name,
            email: company.email,
            active: company.active,
            created_at: company.created_at.to_string(),
        }
    }
}
