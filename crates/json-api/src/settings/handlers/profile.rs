//! Update Profile Handler

use std::sync::Arc;

use keyhold_app::domain::companies::records::CompanyRecord;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ApiError, extensions::*, state::State};

/// Update Profile Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProfileRequest {
    /// New display name
    #[serde(default)]
    pub name: String,
}

/// Profile fields after an update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileCompany {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<CompanyRecord> for ProfileCompany {
    fn from(company: CompanyRecord) -> Self {
        Self {
            id: company.uuid.into_uuid(),
            name: company.name,
            email: company.email,
        }
    }
}

/// Profile Updated Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileUpdatedResponse {
    pub message: String,
    pub company: ProfileCompany,
}

/// Update Profile Handler
#[endpoint(
    tags("settings"),
    summary = "Update Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Name is required"),
        (status_code = StatusCode::NOT_FOUND, description = "Company not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateProfileRequest>,
    depot: &mut Depot,
) -> Result<Json<ProfileUpdatedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let company = depot.company_uuid_or_401()?;

    let updated = state
        .app
        .auth
        .update_profile(company, json.into_inner().name)
        .await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully".to_string(),
        company: updated.into(),
    }))
}

#[cfg(test)]
mod tests {
    use keyhold_app::auth::{AuthServiceError, MockAuthService};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_COMPANY_UUID, auth_service, make_company};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        auth_service(auth, Router::with_path("api/settings/profile").put(handler))
    }

    #[tokio::test]
    async fn test_update_profile_success() -> TestResult {
        let mut company = make_company(TEST_COMPANY_UUID);
        company.name = "Acme Rockets".to_string();

        let mut auth = MockAuthService::new();

        auth.expect_update_profile()
            .once()
            .withf(|uuid, name| *uuid == TEST_COMPANY_UUID && name == "Acme Rockets")
            .return_once(move |_, _| Ok(company));

        let mut res = TestClient::put("http://example.com/api/settings/profile")
            .json(&json!({ "name": "Acme Rockets" }))
            .send(&make_service(auth))
            .await;

        let body: ProfileUpdatedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.company.name, "Acme Rockets");
        assert_eq!(body.company.id, TEST_COMPANY_UUID.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_name_returns_400() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_update_profile()
            .once()
            .return_once(|_, _| Err(AuthServiceError::Validation("Name is required")));

        let res = TestClient::put("http://example.com/api/settings/profile")
            .json(&json!({ "name": "" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
