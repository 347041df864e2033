//! Cache Config

use clap::Args;

/// API key cache settings.
#[derive(Debug, Args)]
pub struct CacheConfig {
    /// Redis connection string; API key validation reads the database when unset
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    pub redis_url: Option<String>,
}
