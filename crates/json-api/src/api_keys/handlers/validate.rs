//! Validate API Key Handler

use std::sync::Arc;

use keyhold_app::domain::companies::records::CompanyUuid;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ApiError, extensions::*, state::State};

/// Validate API Key Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidateApiKeyRequest {
    #[serde(default)]
    pub api_key: String,
}

/// Validate API Key Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidateApiKeyResponse {
    pub valid: bool,

    /// Owning company, when the key is valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
}

/// Validate API Key Handler
///
/// Resolves an API key to its company. Unknown keys are a normal `valid: false` answer.
#[endpoint(
    tags("api-keys"),
    summary = "Validate API Key",
    responses(
        (status_code = StatusCode::OK, description = "Validation result"),
        (status_code = StatusCode::BAD_REQUEST, description = "API key is required"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateApiKeyRequest>,
    depot: &mut Depot,
) -> Result<Json<ValidateApiKeyResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let api_key = json.into_inner().api_key;

    if api_key.trim().is_empty() {
        return Err(ApiError::bad_request("API key is required"));
    }

    let company = state.app.auth.validate_api_key(&api_key).await?;

    Ok(Json(ValidateApiKeyResponse {
        valid: company.is_some(),
        company_id: company.map(CompanyUuid::into_uuid),
    }))
}

#[cfg(test)]
mod tests {
    use keyhold_app::auth::MockAuthService;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        errors::ErrorResponse,
        test_helpers::{TEST_COMPANY_UUID, public_service},
    };

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        public_service(auth, Router::with_path("api/api-keys/validate").post(handler))
    }

    #[tokio::test]
    async fn test_known_key_is_valid() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_validate_api_key()
            .once()
            .withf(|key| key == "ak_known")
            .return_once(|_| Ok(Some(TEST_COMPANY_UUID)));

        let mut res = TestClient::post("http://example.com/api/api-keys/validate")
            .json(&json!({ "apiKey": "ak_known" }))
            .send(&make_service(auth))
            .await;

        let body: ValidateApiKeyResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.valid, "known key should validate");
        assert_eq!(body.company_id, Some(TEST_COMPANY_UUID.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_key_is_invalid() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_validate_api_key()
            .once()
            .return_once(|_| Ok(None));

        let mut res = TestClient::post("http://example.com/api/api-keys/validate")
            .json(&json!({ "apiKey": "ak_unknown" }))
            .send(&make_service(auth))
            .await;

        let body: ValidateApiKeyResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!body.valid, "unknown key should not validate");
        assert_eq!(body.company_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_key_returns_400() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_validate_api_key().never();

        let mut res = TestClient::post("http://example.com/api/api-keys/validate")
            .json(&json!({ "apiKey": "  " }))
            .send(&make_service(auth))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.error, "API key is required");

        Ok(())
    }
}
