//! Database Config

use std::time::Duration;

use clap::Args;
use keyhold_app::database::PoolSettings;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5_u32)]
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECONDS", default_value_t = 5_u64)]
    pub db_acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Pool bounds for the credential store.
    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout_seconds),
        }
    }
}
