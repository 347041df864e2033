//! Register Handler

use std::sync::Arc;

use keyhold_app::auth::Registration;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{auth::models::SessionResponse, errors::ApiError, extensions::*, state::State};

/// Register Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    /// Company display name
    #[serde(default)]
    pub name: String,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Registration {
            email: request.email,
            password: request.password,
            name: request.name,
        }
    }
}

/// Register Handler
///
/// Creates a company with a password and signs it in.
#[endpoint(
    tags("auth"),
    summary = "Register Company",
    responses(
        (status_code = StatusCode::CREATED, description = "Company registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or malformed fields"),
        (status_code = StatusCode::CONFLICT, description = "Company already exists"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SessionResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let grant = state.app.auth.register(json.into_inner().into()).await?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(SessionResponse::new("Registration successful", grant)))
}

#[cfg(test)]
mod tests {
    use keyhold_app::auth::{AuthServiceError, MockAuthService};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        errors::ErrorResponse,
        test_helpers::{TEST_COMPANY_UUID, make_grant, public_service},
    };

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        public_service(auth, Router::with_path("api/register").post(handler))
    }

    #[tokio::test]
    async fn test_register_success() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .withf(|registration| {
                registration.email == "ops@acme.test"
                    && registration.password == "hunter22"
                    && registration.name == "Acme"
            })
            .return_once(|_| Ok(make_grant(TEST_COMPANY_UUID)));

        let mut res = TestClient::post("http://example.com/api/register")
            .json(&json!({ "email": "ops@acme.test", "password": "hunter22", "name": "Acme" }))
            .send(&make_service(auth))
            .await;

        let body: SessionResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.message, "Registration successful");
        assert_eq!(body.company.id, TEST_COMPANY_UUID.into_uuid());
        assert_eq!(body.company.api_key, "ak_0123456789abcdef");
        assert_eq!(body.token, "session.jwt.token");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_missing_field_reaches_validation() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .withf(|registration| registration.name.is_empty())
            .return_once(|_| Err(AuthServiceError::Validation("All fields are required")));

        let mut res = TestClient::post("http://example.com/api/register")
            .json(&json!({ "email": "ops@acme.test", "password": "hunter22" }))
            .send(&make_service(auth))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.error, "All fields are required");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_existing_email_returns_409() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::Conflict));

        let res = TestClient::post("http://example.com/api/register")
            .json(&json!({ "email": "ops@acme.test", "password": "hunter22", "name": "Acme" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
