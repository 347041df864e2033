use clap::{Args, Subcommand};

mod create;
mod toggle_status;

#[derive(Debug, Args)]
pub(crate) struct CompanyCommand {
    #[command(subcommand)]
    command: CompanySubcommand,
}

#[derive(Debug, Subcommand)]
enum CompanySubcommand {
    Create(create::CreateCompanyArgs),
    ToggleStatus(toggle_status::ToggleStatusArgs),
}

pub(crate) async fn run(command: CompanyCommand) -> Result<(), String> {
    match command.command {
        CompanySubcommand::Create(args) => create::run(args).await,
        CompanySubcommand::ToggleStatus(args) => toggle_status::run(args).await,
    }
}
