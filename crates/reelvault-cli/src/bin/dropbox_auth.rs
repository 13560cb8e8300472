//! One-time Dropbox authorization flow.
//!
//! Prints the authorize URL, waits for the browser redirect on a loopback
//! listener, exchanges the code for tokens, prints them, and exits. Run it
//! once per app to obtain the refresh token the other tools use.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use tokio::sync::{oneshot, Mutex};

use reelvault_core::OpsConfig;
use reelvault_dropbox::OAuthApp;

type CodeSender = Arc<Mutex<Option<oneshot::Sender<String>>>>;

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
    let (app_key, app_secret) = config.dropbox.app_credentials()?;
    let redirect_uri = config.dropbox.redirect_uri();

    let app = OAuthApp::new(app_key, app_secret, redirect_uri.clone())?;

    println!("Open this URL in a browser and approve access:");
    println!();
    println!("  {}", app.authorize_url());
    println!();
    println!("Waiting for the redirect on {} ...", redirect_uri);

    let code = wait_for_code(config.dropbox.redirect_port).await?;
    let tokens = app.exchange_code(&code).await?;

    println!();
    println!("Access token:  {}", tokens.access_token);
    if let Some(refresh_token) = &tokens.refresh_token {
        println!("Refresh token: {}", refresh_token);
    }
    if let Some(expires_in) = tokens.expires_in {
        println!("Expires in:    {}s", expires_in);
    }
    println!();
    println!("Store these as DROPBOX_ACCESS_TOKEN / DROPBOX_REFRESH_TOKEN.");

    Ok(())
}

/// Serve /callback on the loopback interface until one code arrives.
async fn wait_for_code(port: u16) -> Result<String> {
    let (tx, rx) = oneshot::channel();
    let state: CodeSender = Arc::new(Mutex::new(Some(tx)));

    let router = Router::new()
        .route("/callback", get(callback))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("Failed to bind 127.0.0.1:{}", port))?;
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let code = rx
        .await
        .context("Redirect listener closed before a code arrived")?;
    server.abort();
    Ok(code)
}

async fn callback(
    State(state): State<CodeSender>,
    Query(params): Query<HashMap<String, String>>,
) -> &'static str {
    match params.get("code") {
        Some(code) => {
            if let Some(tx) = state.lock().await.take() {
                let _ = tx.send(code.clone());
            }
            "Authorization received. You can close this tab."
        }
        None => {
            if let Some(error) = params.get("error") {
                tracing::warn!(error = %error, "Authorization was denied");
            }
            "Missing code parameter. Approve access and try again."
        }
    }
}
