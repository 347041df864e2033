//! Toggle Company Status Handler

use std::sync::Arc;

use keyhold_app::domain::companies::records::{CompanyRecord, CompanyUuid};
use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ApiError, extensions::*, state::State};

/// Company status after a toggle
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CompanyStatus {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub active: bool,
}

impl From<CompanyRecord> for CompanyStatus {
    fn from(company: CompanyRecord) -> Self {
        Self {
            id: company.uuid.into_uuid(),
            name: company.name,
            email: company.email,
            active: company.active,
        }
    }
}

/// Company Status Toggled Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CompanyStatusResponse {
    pub message: String,
    pub company: CompanyStatus,
}

/// Toggle Company Status Handler
#[endpoint(
    tags("companies"),
    summary = "Toggle Company Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status flipped"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed company id"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::NOT_FOUND, description = "Company not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CompanyStatusResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.company_uuid_or_401()?;

    let target = Uuid::parse_str(&id.into_inner())
        .map(CompanyUuid::from_uuid)
        .map_err(|_ignored| ApiError::bad_request("Invalid company id"))?;

    let company = state.app.auth.toggle_company_status(target).await?;

    let message = if company.active {
        "Company activated successfully"
    } else {
        "Company deactivated successfully"
    };

    Ok(Json(CompanyStatusResponse {
        message: message.to_string(),
        company: company.into(),
    }))
}

#[cfg(test)]
mod tests {
    use keyhold_app::auth::{AuthServiceError, MockAuthService};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{auth_service, make_company};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        auth_service(
            auth,
            Router::with_path("api/companies/{id}/toggle-status").patch(handler),
        )
    }

    #[tokio::test]
    async fn test_toggle_deactivates() -> TestResult {
        let target = CompanyUuid::new();

        let mut auth = MockAuthService::new();

        auth.expect_toggle_company_status()
            .once()
            .withf(move |uuid| *uuid == target)
            .return_once(move |uuid| {
                let mut company = make_company(uuid);
                company.active = false;

                Ok(company)
            });

        let mut res = TestClient::patch(format!(
            "http://example.com/api/companies/{target}/toggle-status"
        ))
        .send(&make_service(auth))
        .await;

        let body: CompanyStatusResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "Company deactivated successfully");
        assert!(!body.company.active, "company should now be inactive");

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_id_returns_400() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_toggle_company_status().never();

        let res = TestClient::patch("http://example.com/api/companies/not-a-uuid/toggle-status")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_company_returns_404() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_toggle_company_status()
            .once()
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::patch(format!(
            "http://example.com/api/companies/{}/toggle-status",
            Uuid::now_v7()
        ))
        .send(&make_service(auth))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
