use clap::Args;
use keyhold_app::domain::companies::records::CompanyUuid;

use crate::cli::ConnectArgs;

#[derive(Debug, Args)]
pub(crate) struct RotateApiKeyArgs {
    /// Company UUID
    #[arg(long)]
    uuid: CompanyUuid,

    #[command(flatten)]
    connect: ConnectArgs,
}

pub(crate) async fn run(args: RotateApiKeyArgs) -> Result<(), String> {
    let auth = args.connect.connect().await?;

    let api_key = auth
        .rotate_api_key(args.uuid)
        .await
        .map_err(|error| format!("failed to rotate api key: {error}"))?;

    println!("company_uuid: {}", args.uuid);
    println!("api_key: {api_key}");
    println!("the previous key no longer validates");

    Ok(())
}
