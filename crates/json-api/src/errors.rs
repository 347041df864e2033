//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": "<message>"}`. The status code for each
//! [`AuthServiceError`] is decided here and nowhere else.

use keyhold_app::auth::AuthServiceError;
use salvo::{
    catcher::Catcher,
    oapi::{Components, EndpointOutRegister, Operation, ToSchema},
    prelude::*,
    writing::Scribe,
};
use serde::{Deserialize, Serialize};

/// Error body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Client-safe failure message
    pub error: String,
}

/// A status code with a client-safe message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub(crate) fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        let status = match &error {
            AuthServiceError::Validation(_) | AuthServiceError::NoPasswordSet => {
                StatusCode::BAD_REQUEST
            }
            AuthServiceError::Conflict => StatusCode::CONFLICT,
            AuthServiceError::InvalidCredentials
            | AuthServiceError::Unauthenticated
            | AuthServiceError::Federation(_) => StatusCode::UNAUTHORIZED,
            AuthServiceError::NotFound => StatusCode::NOT_FOUND,
            AuthServiceError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };

        Self::new(status, error.to_string())
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ErrorResponse {
            error: self.message,
        }));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, _operation: &mut Operation) {
        // Statuses are listed per endpoint; only the body schema is shared.
        let _schema = ErrorResponse::to_schema(components);
    }
}

/// Catcher that gives unhandled error statuses the same `{"error": ...}` body.
///
/// Only runs for responses that reach the service with an error status and no body of their
/// own, such as unknown routes or request bodies the extractors reject.
pub(crate) fn catcher() -> Catcher {
    Catcher::default().hoop(render_status_error)
}

#[handler]
async fn render_status_error(res: &mut Response, ctrl: &mut FlowCtrl) {
    let status = res.status_code.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = match status {
        StatusCode::NOT_FOUND => "Route not found",
        StatusCode::BAD_REQUEST => "Invalid request body",
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported media type",
        _ if status.is_server_error() => "Internal server error",
        _ => status.canonical_reason().unwrap_or("Request failed"),
    };

    res.render(ApiError::new(status, message));
    ctrl.skip_rest();
}

#[cfg(test)]
mod tests {
    use keyhold_app::auth::oauth::FederationError;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn auth_errors_map_to_statuses() {
        let cases = [
            (
                AuthServiceError::Validation("Invalid email format"),
                StatusCode::BAD_REQUEST,
            ),
            (AuthServiceError::Conflict, StatusCode::CONFLICT),
            (AuthServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthServiceError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AuthServiceError::NoPasswordSet, StatusCode::BAD_REQUEST),
            (
                AuthServiceError::Federation(FederationError::NoEmail),
                StatusCode::UNAUTHORIZED,
            ),
            (AuthServiceError::NotFound, StatusCode::NOT_FOUND),
            (
                AuthServiceError::ServiceUnavailable,
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            let message = error.to_string();
            let api_error = ApiError::from(error);

            assert_eq!(api_error.status, expected, "{message}");
            assert_eq!(api_error.message, message);
        }
    }

    #[handler]
    async fn conflict() -> Result<StatusCode, ApiError> {
        Err(AuthServiceError::Conflict.into())
    }

    #[handler]
    async fn bare_status(res: &mut Response) {
        res.status_code(StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn catcher_renders_bare_statuses_as_error_bodies() -> TestResult {
        let router = Router::new().push(Router::with_path("upstream").get(bare_status));
        let service = Service::new(router).catcher(catcher());

        let mut missing = TestClient::get("http://example.com/nope").send(&service).await;
        let missing_body: ErrorResponse = missing.take_json().await?;

        assert_eq!(missing.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(missing_body.error, "Route not found");

        let mut upstream = TestClient::get("http://example.com/upstream").send(&service).await;
        let upstream_body: ErrorResponse = upstream.take_json().await?;

        assert_eq!(upstream.status_code, Some(StatusCode::BAD_GATEWAY));
        assert_eq!(upstream_body.error, "Internal server error");

        Ok(())
    }

    #[tokio::test]
    async fn catcher_leaves_rendered_errors_alone() -> TestResult {
        let service = Service::new(Router::new().get(conflict)).catcher(catcher());

        let mut res = TestClient::get("http://example.com").send(&service).await;
        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body.error, "Company already exists");

        Ok(())
    }

    #[tokio::test]
    async fn renders_error_body() -> TestResult {
        let mut res = TestClient::get("http://example.com")
            .send(&Service::new(Router::new().get(conflict)))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body.error, "Company already exists");

        Ok(())
    }
}
