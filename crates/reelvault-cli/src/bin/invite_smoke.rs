//! Invite smoke test: logs in as the admin and sends one invite.

use anyhow::Result;
use clap::Parser;

use reelvault_api_client::ApiClient;
use reelvault_cli::print_json;
use reelvault_core::OpsConfig;

#[derive(Parser, Debug)]
#[command(name = "invite_smoke")]
#[command(about = "Send a user invite through the application API")]
struct Args {
    /// Email address to invite
    email: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = OpsConfig::from_env()?;
    let (email, password) = config.api.admin_login()?;

    println!("Logging in to {} as {}", config.api.base_url, email);
    let client = ApiClient::login(&config.api.base_url, email, password).await?;

    println!("Inviting {}", args.email);
    let invite = client.invite_user(&args.email).await?;
    print_json(&invite)?;

    Ok(())
}
