//! Generate API Key Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{errors::ApiError, extensions::*, state::State};

/// API Key Generated Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiKeyGeneratedResponse {
    pub message: String,

    /// The new API key; the previous one stops working immediately
    pub api_key: String,
}

/// Generate API Key Handler
#[endpoint(
    tags("api-keys"),
    summary = "Rotate API Key",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "API key rotated"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::NOT_FOUND, description = "Company not found"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ApiKeyGeneratedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let company = depot.company_uuid_or_401()?;

    let api_key = state.app.auth.rotate_api_key(company).await?;

    info!(company = %company, "api key rotated via http");

    Ok(Json(ApiKeyGeneratedResponse {
        message: "API key generated successfully".to_string(),
        api_key,
    }))
}

#[cfg(test)]
mod tests {
    use keyhold_app::auth::{AuthServiceError, MockAuthService};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_COMPANY_UUID, auth_service};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        auth_service(auth, Router::with_path("api/generate-api-key").post(handler))
    }

    #[tokio::test]
    async fn test_generate_api_key() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_rotate_api_key()
            .once()
            .withf(|company| *company == TEST_COMPANY_UUID)
            .return_once(|_| Ok("ak_fresh".to_string()));

        let mut res = TestClient::post("http://example.com/api/generate-api-key")
            .send(&make_service(auth))
            .await;

        let body: ApiKeyGeneratedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "API key generated successfully");
        assert_eq!(body.api_key, "ak_fresh");

        Ok(())
    }

    #[tokio::test]
    async fn test_generate_api_key_store_down_returns_503() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_rotate_api_key()
            .once()
            .return_once(|_| Err(AuthServiceError::ServiceUnavailable));

        let res = TestClient::post("http://example.com/api/generate-api-key")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        Ok(())
    }
}
