//! Server configuration module

use clap::Parser;
use keyhold_app::context::AppConfig;

use crate::config::{
    auth::AuthConfig,
    cache::CacheConfig,
    db::DatabaseConfig,
    github::GitHubOAuthConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod cache;
pub(crate) mod db;
pub(crate) mod github;
pub(crate) mod observability;
pub(crate) mod server;

/// Keyhold JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "keyhold-json", about = "Keyhold JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Credential store settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Session signing settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// GitHub OAuth settings.
    #[command(flatten)]
    pub github: GitHubOAuthConfig,

    /// API key cache settings.
    #[command(flatten)]
    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings for the credential core.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database.database_url.clone(),
            pool: self.database.pool_settings(),
            jwt_secret: self.auth.jwt_secret.clone(),
            timeouts: self.auth.timeouts(),
            github: self.github.provider_config(),
            cache_url: self
                .cache
                .redis_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
        }
    }
}
