//! Video CRUD smoke test against the application API.
//!
//! Runs the full record lifecycle: login, health, create, get, list, update,
//! delete. Any failed step aborts the run with the API's error.

use anyhow::Result;

use reelvault_api_client::{ApiClient, NewVideo, VideoPatch};
use reelvault_core::OpsConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = OpsConfig::from_env()?;
    let (email, password) = config.api.admin_login()?;

    println!("[1/7] Logging in to {} as {}", config.api.base_url, email);
    let client = ApiClient::login(&config.api.base_url, email, password).await?;

    println!("[2/7] Checking API health");
    let health = client.health().await?;
    println!("      {}", health);

    println!("[3/7] Creating a video record");
    let created = client
        .create_video(&NewVideo {
            title: format!(
                "Smoke test {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
            ),
            client_slug: "smoke-test".to_string(),
            dropbox_path: "/dashboard/clients/smoke-test/test.mp4".to_string(),
        })
        .await?;
    println!("      id {}", created.id);

    println!("[4/7] Fetching it back");
    let fetched = client.get_video(created.id).await?;
    if fetched.id != created.id {
        anyhow::bail!("Fetched a different record: {}", fetched.id);
    }

    println!("[5/7] Listing videos");
    let videos = client.list_videos().await?;
    if !videos.iter().any(|video| video.id == created.id) {
        anyhow::bail!("Created record is missing from the listing");
    }
    println!("      {} records", videos.len());

    println!("[6/7] Updating the title");
    let updated = client
        .update_video(
            created.id,
            &VideoPatch {
                title: Some("Smoke test (updated)".to_string()),
                ..Default::default()
            },
        )
        .await?;
    if updated.title != "Smoke test (updated)" {
        anyhow::bail!("Title was not updated: {}", updated.title);
    }

    println!("[7/7] Deleting it");
    client.delete_video(created.id).await?;

    println!("All steps passed.");
    Ok(())
}
