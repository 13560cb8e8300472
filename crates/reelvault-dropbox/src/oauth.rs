//! OAuth2 authorization for the Dropbox app.
//!
//! Covers the two grants the tooling uses: the one-time authorization-code
//! exchange (driven by the `dropbox_auth` binary) and the refresh-token grant
//! the client performs at startup when no direct access token is configured.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{DropboxError, DropboxResult};

const AUTHORIZE_URL: &str = "https://www.dropbox.com/oauth2/authorize";
const TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";

/// Token endpoint response for both grants.
///
/// `refresh_token` is only present on the authorization-code exchange (and
/// only when offline access was requested).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

/// App credentials for the authorization-code flow.
#[derive(Clone, Debug)]
pub struct OAuthApp {
    client: Client,
    app_key: String,
    app_secret: String,
    redirect_uri: String,
    token_url: String,
}

impl OAuthApp {
    pub fn new(app_key: String, app_secret: String, redirect_uri: String) -> DropboxResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            app_key,
            app_secret,
            redirect_uri,
            token_url: TOKEN_URL.to_string(),
        })
    }

    /// Point the token exchange at a different endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// URL the operator opens in a browser to approve access.
    ///
    /// Requests offline access so the response carries a refresh token.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&response_type=code&token_access_type=offline&redirect_uri={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.app_key),
            urlencoding::encode(&self.redirect_uri)
        )
    }

    /// Exchange the redirect code for tokens.
    pub async fn exchange_code(&self, code: &str) -> DropboxResult<TokenResponse> {
        request_token(
            &self.client,
            &self.token_url,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.redirect_uri),
                ("client_id", &self.app_key),
                ("client_secret", &self.app_secret),
            ],
        )
        .await
    }
}

/// Obtain a short-lived access token from a refresh token.
pub async fn refresh_access_token(
    app_key: &str,
    app_secret: &str,
    refresh_token: &str,
) -> DropboxResult<TokenResponse> {
    let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
    refresh_access_token_at(&client, TOKEN_URL, app_key, app_secret, refresh_token).await
}

async fn refresh_access_token_at(
    client: &Client,
    token_url: &str,
    app_key: &str,
    app_secret: &str,
    refresh_token: &str,
) -> DropboxResult<TokenResponse> {
    request_token(
        client,
        token_url,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", app_key),
            ("client_secret", app_secret),
        ],
    )
    .await
}

async fn request_token(
    client: &Client,
    token_url: &str,
    params: &[(&str, &str)],
) -> DropboxResult<TokenResponse> {
    let response = client.post(token_url).form(params).send().await?;

    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    match status.as_u16() {
        400 | 401 => Err(DropboxError::Auth(error_text)),
        status => Err(DropboxError::Api {
            status,
            summary: error_text,
        }),
    }
}
