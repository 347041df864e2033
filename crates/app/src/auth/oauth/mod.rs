//! Third-party identity federation.

mod federation;
mod github;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub use federation::FederationAdapter;
pub use github::{GitHubConfig, GitHubProvider};

/// Identity assertion returned by a provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    /// Stable account id at the provider.
    pub provider_id: String,

    /// Best email the provider would share, if any.
    pub email: Option<String>,

    /// Human-readable name, when the account has one.
    pub display_name: Option<String>,

    /// Provider handle.
    pub login: String,
}

impl ProviderProfile {
    /// Name to give a company provisioned from this profile.
    #[must_use]
    pub fn company_name(&self) -> String {
        [self.display_name.as_deref(), Some(self.login.as_str()), self.email.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
            .unwrap_or("GitHub User")
            .to_string()
    }
}

#[derive(Debug, Error)]
pub enum FederationError {
    #[error("GitHub account has no email address")]
    NoEmail,

    #[error("OAuth state is invalid or expired")]
    InvalidState,

    #[error("GitHub authentication failed")]
    Exchange(String),
}

#[derive(Debug, Error)]
pub enum OAuthProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider rejected the request: {0}")]
    Rejected(String),

    #[error("invalid provider configuration: {0}")]
    Configuration(String),
}

/// An OAuth 2.0 authorization-code identity provider.
#[automock]
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// URL to send the browser to, carrying `state`.
    fn authorize_url(&self, state: &str) -> String;

    /// Exchange an authorization `code` for the account's profile.
    async fn fetch_profile(&self, code: &str) -> Result<ProviderProfile, OAuthProviderError>;
}
