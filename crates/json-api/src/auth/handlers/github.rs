//! GitHub Sign-in Handlers
//!
//! `begin` sends the browser to GitHub with a signed `state`; GitHub sends it back to
//! `callback`, which finishes federation and hands the session token to the client app.

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::QueryParam, prelude::*};

use crate::{errors::ApiError, extensions::*, state::State};

/// Begin GitHub Sign-in
#[endpoint(
    tags("auth"),
    summary = "Begin GitHub Sign-in",
    responses(
        (status_code = StatusCode::FOUND, description = "Redirect to GitHub"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "GitHub sign-in not configured"),
    ),
)]
pub(crate) async fn begin(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let authorize_url = state.app.auth.oauth_begin()?;

    res.add_header(LOCATION, authorize_url, true)
        .or_500("failed to set location header")?;

    Ok(StatusCode::FOUND)
}

/// Complete GitHub Sign-in
///
/// Redirects to the client app with the session token. The API key is never put in the URL.
#[endpoint(
    tags("auth"),
    summary = "GitHub Sign-in Callback",
    responses(
        (status_code = StatusCode::FOUND, description = "Redirect to the client with a session token"),
        (status_code = StatusCode::UNAUTHORIZED, description = "GitHub authentication failed"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
pub(crate) async fn callback(
    code: QueryParam<String, false>,
    state: QueryParam<String, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, ApiError> {
    let app_state = depot.obtain_or_500::<Arc<State>>()?;

    let code = code.into_inner().unwrap_or_default();
    let oauth_state = state.into_inner().unwrap_or_default();

    let grant = app_state.app.auth.oauth_callback(&code, &oauth_state).await?;

    res.add_header(
        LOCATION,
        client_redirect(&app_state.client_url, &grant.token),
        true,
    )
    .or_500("failed to set location header")?;

    Ok(StatusCode::FOUND)
}

fn client_redirect(client_url: &str, token: &str) -> String {
    format!(
        "{}/auth/github/callback?token={token}",
        client_url.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use keyhold_app::auth::{AuthServiceError, MockAuthService, oauth::FederationError};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        errors::ErrorResponse,
        test_helpers::{TEST_CLIENT_URL, TEST_COMPANY_UUID, make_grant, public_service},
    };

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        public_service(
            auth,
            Router::with_path("api/auth/github")
                .get(begin)
                .push(Router::with_path("callback").get(callback)),
        )
    }

    fn location(res: &Response) -> Option<String> {
        res.headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
    }

    #[test]
    fn client_redirect_carries_only_the_token() {
        assert_eq!(
            client_redirect("http://client.example.com/", "a.b.c"),
            "http://client.example.com/auth/github/callback?token=a.b.c"
        );
    }

    #[tokio::test]
    async fn test_begin_redirects_to_provider() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_oauth_begin()
            .once()
            .return_once(|| Ok("https://github.com/login/oauth/authorize?state=s".to_string()));

        let res = TestClient::get("http://example.com/api/auth/github")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FOUND));
        assert_eq!(
            location(&res).as_deref(),
            Some("https://github.com/login/oauth/authorize?state=s")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_begin_without_provider_returns_503() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_oauth_begin()
            .once()
            .return_once(|| Err(AuthServiceError::ServiceUnavailable));

        let res = TestClient::get("http://example.com/api/auth/github")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        Ok(())
    }

    #[tokio::test]
    async fn test_callback_redirects_with_token_only() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_oauth_callback()
            .once()
            .withf(|code, state| code == "the-code" && state == "the-state")
            .return_once(|_, _| Ok(make_grant(TEST_COMPANY_UUID)));

        let res = TestClient::get(
            "http://example.com/api/auth/github/callback?code=the-code&state=the-state",
        )
        .send(&make_service(auth))
        .await;

        let location = location(&res).unwrap_or_default();

        assert_eq!(res.status_code, Some(StatusCode::FOUND));
        assert_eq!(
            location,
            format!("{TEST_CLIENT_URL}/auth/github/callback?token=session.jwt.token")
        );
        assert!(!location.contains("ak_"), "api key must not be in the redirect");

        Ok(())
    }

    #[tokio::test]
    async fn test_callback_bad_state_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_oauth_callback()
            .once()
            .withf(|code, state| code == "the-code" && state.is_empty())
            .return_once(|_, _| Err(FederationError::InvalidState.into()));

        let mut res = TestClient::get("http://example.com/api/auth/github/callback?code=the-code")
            .send(&make_service(auth))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert!(!body.error.is_empty(), "error message should be present");

        Ok(())
    }
}
