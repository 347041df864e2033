use clap::{Args, Subcommand};

mod rotate;

#[derive(Debug, Args)]
pub(crate) struct ApiKeyCommand {
    #[command(subcommand)]
    command: ApiKeySubcommand,
}

#[derive(Debug, Subcommand)]
enum ApiKeySubcommand {
    Rotate(rotate::RotateApiKeyArgs),
}

pub(crate) async fn run(command: ApiKeyCommand) -> Result<(), String> {
    match command.command {
        ApiKeySubcommand::Rotate(args) => rotate::run(args).await,
    }
}
