use clap::Args;
use keyhold_app::domain::companies::records::CompanyUuid;

use crate::cli::ConnectArgs;

#[derive(Debug, Args)]
pub(crate) struct ToggleStatusArgs {
    /// Company UUID
    #[arg(long)]
    uuid: CompanyUuid,

    #[command(flatten)]
    connect: ConnectArgs,
}

pub(crate) async fn run(args: ToggleStatusArgs) -> Result<(), String> {
    let auth = args.connect.connect().await?;

    let company = auth
        .toggle_company_status(args.uuid)
        .await
        .map_err(|error| format!("failed to toggle company status: {error}"))?;

    println!("company_uuid: {}", company.uuid);
    println!("active: {}", company.active);

    Ok(())
}
