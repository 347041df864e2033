//! Show API Key Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{errors::ApiError, extensions::*, state::State};

/// API Key Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiKeyResponse {
    /// The company's current API key
    pub api_key: String,
}

/// Show API Key Handler
#[endpoint(
    tags("api-keys"),
    summary = "Get API Key",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Current API key"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::NOT_FOUND, description = "Company not found"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ApiKeyResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let company = depot.company_uuid_or_401()?;

    let api_key = state.app.auth.get_api_key(company).await?;

    Ok(Json(ApiKeyResponse { api_key }))
}

#[cfg(test)]
mod tests {
    use keyhold_app::auth::{AuthServiceError, MockAuthService};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_COMPANY_UUID, auth_service};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        auth_service(auth, Router::with_path("api/api-keys").get(handler))
    }

    #[tokio::test]
    async fn test_show_api_key() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_get_api_key()
            .once()
            .withf(|company| *company == TEST_COMPANY_UUID)
            .return_once(|_| Ok("ak_current".to_string()));

        let mut res = TestClient::get("http://example.com/api/api-keys")
            .send(&make_service(auth))
            .await;

        let body: ApiKeyResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.api_key, "ak_current");

        Ok(())
    }

    #[tokio::test]
    async fn test_show_api_key_missing_company_returns_404() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_get_api_key()
            .once()
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com/api/api-keys")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
