//! Auth Config

use std::time::Duration;

use clap::Args;
use keyhold_app::auth::AuthTimeouts;

/// Session signing and credential operation settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Upper bound for a single credential store call, in milliseconds
    #[arg(long, env = "AUTH_STORE_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub store_timeout_ms: u64,

    /// Upper bound for a single password hash or verification, in milliseconds
    #[arg(long, env = "AUTH_HASH_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub hash_timeout_ms: u64,
}

impl AuthConfig {
    /// Operation time bounds for the auth gateway.
    #[must_use]
    pub fn timeouts(&self) -> AuthTimeouts {
        AuthTimeouts {
            store: Duration::from_millis(self.store_timeout_ms),
            hash: Duration::from_millis(self.hash_timeout_ms),
        }
    }
}
