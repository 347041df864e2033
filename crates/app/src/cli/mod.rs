use clap::{Args, Parser, Subcommand};
use keyhold_app::{
    auth::{AuthService, AuthTimeouts},
    context::{AppConfig, AppContext},
    database::PoolSettings,
};

mod api_key;
mod company;

#[derive(Debug, Parser)]
#[command(name = "keyhold-app", about = "Keyhold CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Company(company::CompanyCommand),
    ApiKey(api_key::ApiKeyCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Company(command) => company::run(command).await,
            Commands::ApiKey(command) => api_key::run(command).await,
        }
    }
}

/// Connection settings shared by every command.
#[derive(Debug, Args)]
pub(crate) struct ConnectArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Optional Redis URL for the API key mirror
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    redis_url: Option<String>,
}

impl ConnectArgs {
    pub(crate) async fn connect(self) -> Result<std::sync::Arc<dyn AuthService>, String> {
        let context = AppContext::from_config(AppConfig {
            database_url: self.database_url,
            pool: PoolSettings {
                max_connections: 1,
                ..PoolSettings::default()
            },
            jwt_secret: self.jwt_secret,
            timeouts: AuthTimeouts::default(),
            github: None,
            cache_url: self.redis_url,
        })
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

        Ok(context.auth)
    }
}
