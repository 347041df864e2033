//! GitHub OAuth Config

use std::time::Duration;

use clap::Args;
use keyhold_app::auth::oauth::GitHubConfig;

/// GitHub OAuth application settings. Federation is disabled unless both the client id and
/// secret are set.
#[derive(Debug, Args)]
pub struct GitHubOAuthConfig {
    /// GitHub OAuth application client id
    #[arg(long, env = "GITHUB_CLIENT_ID")]
    pub github_client_id: Option<String>,

    /// GitHub OAuth application client secret
    #[arg(long, env = "GITHUB_CLIENT_SECRET", hide_env_values = true)]
    pub github_client_secret: Option<String>,

    /// Public base URL of this API, used to build the OAuth callback URL
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:5000")]
    pub api_base_url: String,

    /// Timeout for each request to GitHub, in seconds
    #[arg(long, env = "GITHUB_REQUEST_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub github_request_timeout_seconds: u64,
}

impl GitHubOAuthConfig {
    /// Provider settings, when federation is configured.
    #[must_use]
    pub fn provider_config(&self) -> Option<GitHubConfig> {
        let client_id = self.github_client_id.as_deref().map(str::trim)?;
        let client_secret = self.github_client_secret.as_deref().map(str::trim)?;

        if client_id.is_empty() || client_secret.is_empty() {
            return None;
        }

        Some(GitHubConfig {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            callback_url: format!(
                "{}/api/auth/github/callback",
                self.api_base_url.trim_end_matches('/')
            ),
            request_timeout: Duration::from_secs(self.github_request_timeout_seconds),
        })
    }
}
