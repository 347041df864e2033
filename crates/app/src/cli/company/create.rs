use clap::Args;
use keyhold_app::auth::Registration;

use crate::cli::ConnectArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateCompanyArgs {
    /// Company display name
    #[arg(long)]
    name: String,

    /// Login email
    #[arg(long)]
    email: String,

    /// Initial password
    #[arg(long, env = "COMPANY_PASSWORD", hide_env_values = true)]
    password: String,

    #[command(flatten)]
    connect: ConnectArgs,
}

pub(crate) async fn run(args: CreateCompanyArgs) -> Result<(), String> {
    let auth = args.connect.connect().await?;

    let grant = auth
        .register(Registration {
            email: args.email,
            password: args.password,
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create company: {error}"))?;

    println!("company_uuid: {}", grant.company.uuid);
    println!("company_email: {}", grant.company.email);
    println!("api_key: {}", grant.company.api_key);
    println!("store this key now; it is only shown once");

    Ok(())
}
