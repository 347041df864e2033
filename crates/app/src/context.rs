//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::{
        ApiKeyCache, AuthGateway, AuthService, AuthTimeouts, RedisApiKeyCache, SessionTokens,
        oauth::{GitHubConfig, GitHubProvider, OAuthProvider, OAuthProviderError},
    },
    database::{self, PoolSettings},
    domain::companies::PgCompaniesRepository,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrations(#[source] MigrateError),

    #[error("failed to configure GitHub OAuth")]
    OAuthClient(#[source] OAuthProviderError),

    #[error("token signing secret must not be empty")]
    MissingSigningSecret,
}

/// Everything needed to wire the credential core.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub pool: PoolSettings,
    pub jwt_secret: String,
    pub timeouts: AuthTimeouts,

    /// GitHub OAuth settings; federation routes are unavailable without them.
    pub github: Option<GitHubConfig>,

    /// Redis URL for the API key mirror; no cache when absent.
    pub cache_url: Option<String>,
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppConfig")
            .field("pool", &self.pool)
            .field("jwt_secret", &"**redacted**")
            .field("timeouts", &self.timeouts)
            .field("github", &self.github)
            .field("cache", &self.cache_url.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context: connect, migrate, and wire the auth gateway.
    ///
    /// An unreachable cache is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable, migrations fail, or the OAuth
    /// settings are invalid.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        if config.jwt_secret.trim().is_empty() {
            return Err(AppInitError::MissingSigningSecret);
        }

        let provider = config
            .github
            .map(GitHubProvider::new)
            .transpose()
            .map_err(AppInitError::OAuthClient)?
            .map(|provider| Arc::new(provider) as Arc<dyn OAuthProvider>);

        let pool = database::connect(&config.database_url, config.pool)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        let cache = match config.cache_url.as_deref() {
            Some(url) => connect_cache(url).await,
            None => {
                info!("no cache configured; api key validation reads the store");

                None
            }
        };

        let gateway = AuthGateway::new(
            Arc::new(PgCompaniesRepository::new(pool)),
            cache,
            provider,
            SessionTokens::new(config.jwt_secret.as_bytes()),
            config.timeouts,
        );

        Ok(Self {
            auth: Arc::new(gateway),
        })
    }
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

async fn connect_cache(url: &str) -> Option<Arc<dyn ApiKeyCache>> {
    match RedisApiKeyCache::connect(url).await {
        Ok(cache) => Some(Arc::new(cache)),
        Err(error) => {
            warn!("api key cache unavailable, continuing without it: {error}");

            None
        }
    }
}
