//! Company Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{companies::models::CompanyListing, errors::ApiError, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CompaniesResponse {
    /// Every company, oldest first
    pub companies: Vec<CompanyListing>,
}

/// Company Index Handler
#[endpoint(
    tags("companies"),
    summary = "List Companies",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CompaniesResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.company_uuid_or_401()?;

    let companies = state.app.auth.list_companies().await?;

    Ok(Json(CompaniesResponse {
        companies: companies.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use keyhold_app::{auth::MockAuthService, domain::companies::records::CompanyUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_COMPANY_UUID, auth_service, make_company};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        auth_service(auth, Router::with_path("api/companies").get(handler))
    }

    #[tokio::test]
    async fn test_list_companies() -> TestResult {
        let other = CompanyUuid::new();

        let mut auth = MockAuthService::new();

        auth.expect_list_companies()
            .once()
            .return_once(move || Ok(vec![make_company(TEST_COMPANY_UUID), make_company(other)]));

        let mut res = TestClient::get("http://example.com/api/companies")
            .send(&make_service(auth))
            .await;

        let body: serde_json::Value = res.take_json().await?;
        let listed = body
            .get("companies")
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(listed.len(), 2);
        assert!(
            listed.iter().all(|company| company.get("apiKey").is_none()),
            "listing must not expose api keys"
        );

        Ok(())
    }
}
