//! API key generation, rotation, and validation.

use std::{fmt::Display, future::Future, sync::Arc, time::Duration};

use rand::{RngCore as _, rngs::OsRng};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::{
    auth::{
        AuthServiceError, ResultExt as _,
        cache::{API_KEY_CACHE_TTL, ApiKeyCache},
        timeouts::bounded,
    },
    domain::companies::{CompaniesRepository, records::CompanyUuid},
};

/// API key prefix.
pub const API_KEY_PREFIX: &str = "ak";

/// Number of random bytes encoded in a key.
pub const API_KEY_SECRET_BYTES: usize = 32;

/// Generate a fresh opaque API key: `ak_` followed by 64 lowercase hex characters.
#[must_use]
pub fn generate_api_key() -> String {
    let mut secret = Zeroizing::new([0_u8; API_KEY_SECRET_BYTES]);

    OsRng.fill_bytes(&mut *secret);

    format!("{API_KEY_PREFIX}_{}", encode_hex(&*secret))
}

pub(crate) fn random_hex<const N: usize>() -> String {
    let mut bytes = Zeroizing::new([0_u8; N]);

    OsRng.fill_bytes(&mut *bytes);

    encode_hex(&*bytes)
}

fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        encoded.push(char::from(HEX[usize::from(byte >> 4)]));
        encoded.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }

    encoded
}

/// Owns the API key lifecycle: rotation against the store and the advisory cache mirror.
#[derive(Clone)]
pub struct ApiKeyManager {
    companies: Arc<dyn CompaniesRepository>,
    cache: Option<Arc<dyn ApiKeyCache>>,
    store_timeout: Duration,
}

impl ApiKeyManager {
    #[must_use]
    pub fn new(
        companies: Arc<dyn CompaniesRepository>,
        cache: Option<Arc<dyn ApiKeyCache>>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            companies,
            cache,
            store_timeout,
        }
    }

    /// Replace the company's key in a single store update and return the new key.
    ///
    /// # Errors
    ///
    /// [`AuthServiceError::NotFound`] for an unknown company, or
    /// [`AuthServiceError::ServiceUnavailable`] when the store fails.
    pub async fn rotate(&self, company: CompanyUuid) -> Result<String, AuthServiceError> {
        let rotated = bounded(
            self.store_timeout,
            "rotate_api_key",
            self.companies.rotate_api_key(company, generate_api_key()),
        )
        .await?
        .or_unavailable("failed to rotate api key")?
        .ok_or(AuthServiceError::NotFound)?;

        info!(company = %company, "rotated api key");

        // Moving the current-key pointer retires the old entry even if the eviction fails.
        self.mirror(&rotated.current, company).await;

        if let Some(cache) = &self.cache {
            best_effort(
                self.store_timeout,
                "evict rotated api key",
                cache.evict(&rotated.previous),
            )
            .await;
        }

        Ok(rotated.current)
    }

    /// Current key for `company`.
    ///
    /// # Errors
    ///
    /// [`AuthServiceError::NotFound`] for an unknown company.
    pub async fn get(&self, company: CompanyUuid) -> Result<String, AuthServiceError> {
        bounded(
            self.store_timeout,
            "find_company",
            self.companies.find_company(company),
        )
        .await?
        .or_unavailable("failed to load api key")?
        .map(|record| record.api_key)
        .ok_or(AuthServiceError::NotFound)
    }

    /// Mirror `api_key` into the cache. Failures are logged and ignored.
    pub async fn mirror(&self, api_key: &str, company: CompanyUuid) {
        if let Some(cache) = &self.cache {
            best_effort(
                self.store_timeout,
                "mirror api key",
                cache.store(api_key, company, API_KEY_CACHE_TTL),
            )
            .await;
        }
    }

    /// Find the company owning `api_key`, trying the cache before the store.
    ///
    /// Store hits are not mirrored back: a lookup racing a rotation could otherwise re-insert
    /// the key the rotation just retired.
    ///
    /// # Errors
    ///
    /// [`AuthServiceError::ServiceUnavailable`] when the store fails; cache failures only
    /// degrade to the store path.
    pub async fn resolve(&self, api_key: &str) -> Result<Option<CompanyUuid>, AuthServiceError> {
        if api_key.trim().is_empty() {
            return Ok(None);
        }

        if let Some(cache) = &self.cache
            && let Some(company) = self.cached_company(cache.as_ref(), api_key).await
        {
            return Ok(Some(company));
        }

        let company = bounded(
            self.store_timeout,
            "find_company_by_api_key",
            self.companies.find_company_by_api_key(api_key),
        )
        .await?
        .or_unavailable("failed to validate api key")?
        .map(|record| record.uuid);

        Ok(company)
    }

    /// A cache hit that is still the company's current key.
    async fn cached_company(&self, cache: &dyn ApiKeyCache, api_key: &str) -> Option<CompanyUuid> {
        let company =
            best_effort(self.store_timeout, "look up api key", cache.lookup(api_key)).await??;

        let current = best_effort(
            self.store_timeout,
            "look up current api key",
            cache.current_key(company),
        )
        .await??;

        if current != api_key {
            debug!(company = %company, "ignoring cached api key that is no longer current");

            return None;
        }

        Some(company)
    }
}

impl std::fmt::Debug for ApiKeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyManager")
            .field("cache", &self.cache.is_some())
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

async fn best_effort<T, E, F>(limit: Duration, operation: &'static str, future: F) -> Option<T>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    match timeout(limit, future).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(error)) => {
            warn!(operation, "api key cache degraded: {error}");

            None
        }
        Err(elapsed) => {
            warn!(operation, "api key cache degraded: {elapsed}");

            None
        }
    }
}
