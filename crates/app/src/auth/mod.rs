//! Authentication and credential lifecycle.

mod api_keys;
mod cache;
mod errors;
mod gateway;
mod models;
pub mod oauth;
mod password;
mod session;
mod timeouts;
mod validation;

pub use api_keys::{API_KEY_PREFIX, ApiKeyManager, generate_api_key};
pub use cache::{
    API_KEY_CACHE_TTL, ApiKeyCache, ApiKeyCacheError, MockApiKeyCache, RedisApiKeyCache,
};
pub use errors::AuthServiceError;
pub(crate) use errors::ResultExt;
pub use gateway::{AuthGateway, AuthService, MockAuthService};
pub use models::*;
pub use password::{PasswordHashError, SecretHasher};
pub use session::{OAUTH_STATE_TTL, SESSION_TTL, SessionClaims, SessionTokenError, SessionTokens};
pub use timeouts::{AuthTimeouts, DEFAULT_OPERATION_TIMEOUT};
pub use validation::MIN_PASSWORD_LENGTH;
