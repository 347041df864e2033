//! Short-lived API key mirror.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use async_trait::async_trait;
use mockall::automock;
use redis::{AsyncCommands as _, Client, RedisError, aio::ConnectionManager};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::companies::records::CompanyUuid;

/// How long a mirrored key stays in the cache.
pub const API_KEY_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

const CACHE_KEY_PREFIX: &str = "apikey:";

const CURRENT_KEY_PREFIX: &str = "apikey:current:";

#[derive(Debug, Error)]
pub enum ApiKeyCacheError {
    #[error("cache request failed")]
    Redis(#[from] RedisError),

    #[error("cached company id is not a uuid")]
    Corrupt(#[from] uuid::Error),
}

/// Advisory `api key -> company` lookup. The store stays authoritative.
///
/// Alongside each key entry the cache keeps a `company -> current key` pointer. A key hit only
/// counts while the pointer still names that key, so an entry whose eviction failed stops
/// resolving once the replacement key is stored.
#[automock]
#[async_trait]
pub trait ApiKeyCache: Send + Sync {
    async fn lookup(&self, api_key: &str) -> Result<Option<CompanyUuid>, ApiKeyCacheError>;

    /// The key most recently stored for `company`.
    async fn current_key(&self, company: CompanyUuid) -> Result<Option<String>, ApiKeyCacheError>;

    /// Write the key entry and the company's current-key pointer together.
    async fn store(
        &self,
        api_key: &str,
        company: CompanyUuid,
        ttl: Duration,
    ) -> Result<(), ApiKeyCacheError>;

    async fn evict(&self, api_key: &str) -> Result<(), ApiKeyCacheError>;
}

/// Redis-backed cache using a multiplexed, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisApiKeyCache {
    connection: ConnectionManager,
}

impl RedisApiKeyCache {
    /// Connect to the Redis server at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the first connection fails.
    pub async fn connect(url: &str) -> Result<Self, ApiKeyCacheError> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl ApiKeyCache for RedisApiKeyCache {
    async fn lookup(&self, api_key: &str) -> Result<Option<CompanyUuid>, ApiKeyCacheError> {
        let mut connection = self.connection.clone();

        let value: Option<String> = connection.get(cache_key(api_key)).await?;

        value
            .map(|company| Uuid::parse_str(&company).map(CompanyUuid::from_uuid))
            .transpose()
            .map_err(Into::into)
    }

    async fn current_key(&self, company: CompanyUuid) -> Result<Option<String>, ApiKeyCacheError> {
        let mut connection = self.connection.clone();

        let value: Option<String> = connection.get(pointer_key(company)).await?;

        Ok(value)
    }

    async fn store(
        &self,
        api_key: &str,
        company: CompanyUuid,
        ttl: Duration,
    ) -> Result<(), ApiKeyCacheError> {
        let mut connection = self.connection.clone();

        let () = redis::pipe()
            .atomic()
            .set_ex(cache_key(api_key), company.to_string(), ttl.as_secs())
            .ignore()
            .set_ex(pointer_key(company), api_key, ttl.as_secs())
            .ignore()
            .query_async(&mut connection)
            .await?;

        Ok(())
    }

    async fn evict(&self, api_key: &str) -> Result<(), ApiKeyCacheError> {
        let mut connection = self.connection.clone();

        let () = connection.del(cache_key(api_key)).await?;

        Ok(())
    }
}

impl Debug for RedisApiKeyCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RedisApiKeyCache").finish_non_exhaustive()
    }
}

fn cache_key(api_key: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{api_key}")
}

fn pointer_key(company: CompanyUuid) -> String {
    format!("{CURRENT_KEY_PREFIX}{company}")
}
