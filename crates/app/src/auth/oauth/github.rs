//! GitHub OAuth provider.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::{
    Client, Url,
    header::ACCEPT,
};
use serde::Deserialize;

use crate::auth::oauth::{OAuthProvider, OAuthProviderError, ProviderProfile};

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_BASE_URL: &str = "https://api.github.com";
const SCOPE: &str = "user:email";
const CLIENT_USER_AGENT: &str = "keyhold";

/// GitHub OAuth application settings.
#[derive(Clone)]
pub struct GitHubConfig {
    pub client_id: String,
    pub client_secret: String,

    /// Absolute URL GitHub redirects back to after consent.
    pub callback_url: String,

    /// Upper bound for each request to GitHub.
    pub request_timeout: Duration,
}

impl Debug for GitHubConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GitHubConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"**redacted**")
            .field("callback_url", &self.callback_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GitHubProvider {
    config: GitHubConfig,
    authorize_url: Url,
    http: Client,
}

impl GitHubProvider {
    /// Build a provider from application settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the callback URL is not absolute or the HTTP client cannot be built.
    pub fn new(config: GitHubConfig) -> Result<Self, OAuthProviderError> {
        Url::parse(&config.callback_url).map_err(|error| {
            OAuthProviderError::Configuration(format!("callback url: {error}"))
        })?;

        let authorize_url = Url::parse(AUTHORIZE_URL).map_err(|error| {
            OAuthProviderError::Configuration(format!("authorize url: {error}"))
        })?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(CLIENT_USER_AGENT)
            .build()?;

        Ok(Self {
            config,
            authorize_url,
            http,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<String, OAuthProviderError> {
        let response = self
            .http
            .post(ACCESS_TOKEN_URL)
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OAuthProviderError::Rejected(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        match response.json::<AccessTokenResponse>().await? {
            AccessTokenResponse::Granted { access_token } => Ok(access_token),
            AccessTokenResponse::Denied {
                error,
                error_description,
            } => Err(OAuthProviderError::Rejected(
                error_description.unwrap_or(error),
            )),
        }
    }

    async fn get_json<T>(&self, path: &str, access_token: &str) -> Result<T, OAuthProviderError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .get(format!("{API_BASE_URL}{path}"))
            .header(ACCEPT, "application/vnd.github+json")
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OAuthProviderError::Rejected(format!(
                "GET {path} failed with status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl OAuthProvider for GitHubProvider {
    fn authorize_url(&self, state: &str) -> String {
        let mut url = self.authorize_url.clone();

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.callback_url)
            .append_pair("scope", SCOPE)
            .append_pair("state", state);

        url.into()
    }

    async fn fetch_profile(&self, code: &str) -> Result<ProviderProfile, OAuthProviderError> {
        let access_token = self.exchange_code(code).await?;
        let user: GitHubUser = self.get_json("/user", &access_token).await?;

        let emails = if user.email.as_deref().is_some_and(|email| !email.trim().is_empty()) {
            Vec::new()
        } else {
            self.get_json("/user/emails", &access_token).await?
        };

        Ok(assemble_profile(user, &emails))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AccessTokenResponse {
    Granted {
        access_token: String,
    },
    Denied {
        error: String,
        error_description: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

fn assemble_profile(user: GitHubUser, emails: &[GitHubEmail]) -> ProviderProfile {
    let email = user
        .email
        .filter(|email| !email.trim().is_empty())
        .or_else(|| {
            emails
                .iter()
                .find(|candidate| candidate.primary && candidate.verified)
                .or_else(|| emails.iter().find(|candidate| candidate.verified))
                .map(|candidate| candidate.email.clone())
        });

    ProviderProfile {
        provider_id: user.id.to_string(),
        email,
        display_name: user.name,
        login: user.login,
    }
}
