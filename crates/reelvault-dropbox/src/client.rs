//! HTTP client for the Dropbox v2 API.
//!
//! Only the RPC-style endpoints the tooling needs are covered: metadata
//! lookup, folder creation, and folder listing. Path-level failures arrive as
//! HTTP 409 with a machine-readable `error_summary`; those are mapped onto
//! the error taxonomy so callers can distinguish a missing path from an
//! occupied one.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use reelvault_core::{DropboxCredentials, DropboxSettings, Entry, FileEntry, FolderEntry, RemotePath};

use crate::error::{DropboxError, DropboxResult};
use crate::oauth;
use crate::traits::{ListPage, RemoteStore};

const API_BASE: &str = "https://api.dropboxapi.com";

/// Client for the Dropbox RPC endpoints, authenticated with a bearer token.
#[derive(Clone, Debug)]
pub struct DropboxClient {
    client: Client,
    api_base: String,
    token: String,
}

impl DropboxClient {
    /// Build a client around an already-issued access token.
    pub fn new(token: String) -> DropboxResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            api_base: API_BASE.to_string(),
            token,
        })
    }

    /// Build a client from configured credentials.
    ///
    /// With refresh credentials a fresh access token is obtained once, up
    /// front; the token is not renewed mid-run.
    pub async fn connect(settings: &DropboxSettings) -> DropboxResult<Self> {
        let credentials = settings
            .credentials()
            .map_err(|e| DropboxError::Config(e.to_string()))?;

        let token = match credentials {
            DropboxCredentials::AccessToken(token) => token,
            DropboxCredentials::Refresh {
                app_key,
                app_secret,
                refresh_token,
            } => {
                let response =
                    oauth::refresh_access_token(&app_key, &app_secret, &refresh_token).await?;
                tracing::info!("Obtained access token via refresh grant");
                response.access_token
            }
        };

        Self::new(token)
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn rpc<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> DropboxResult<T> {
        let url = format!("{}{}", self.api_base, endpoint);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(map_api_error(status.as_u16(), &error_text))
    }
}

/// Map a non-success response onto the error taxonomy.
///
/// The provider reports path-level failures as HTTP 409 with an
/// `error_summary` like `path/not_found/..` or `path/conflict/folder/..`.
fn map_api_error(status: u16, body: &str) -> DropboxError {
    let summary = serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.error_summary)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        401 => DropboxError::Auth(summary),
        409 if summary.contains("not_found") => DropboxError::NotFound(summary),
        409 if summary.contains("conflict") => DropboxError::Conflict(summary),
        _ => DropboxError::Api { status, summary },
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_summary: String,
}

#[derive(Debug, Deserialize)]
struct MetadataDto {
    #[serde(rename = ".tag")]
    tag: String,
    name: String,
    path_display: Option<String>,
    path_lower: Option<String>,
    size: Option<u64>,
    server_modified: Option<DateTime<Utc>>,
}

impl MetadataDto {
    /// Convert to a domain entry, falling back to `fallback` when the
    /// provider omitted the display path.
    fn into_entry(self, fallback: &RemotePath) -> DropboxResult<Entry> {
        let path = match self.path_display.or(self.path_lower) {
            Some(raw) => RemotePath::new(&raw)?,
            None => fallback.clone(),
        };
        match self.tag.as_str() {
            "folder" => Ok(Entry::Folder(FolderEntry {
                name: self.name,
                path,
            })),
            "file" => Ok(Entry::File(FileEntry {
                name: self.name,
                path,
                size: self.size,
                server_modified: self.server_modified,
            })),
            other => Err(DropboxError::Api {
                status: 200,
                summary: format!("Unsupported entry tag: {}", other),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateFolderDto {
    metadata: FolderMetadataDto,
}

#[derive(Debug, Deserialize)]
struct FolderMetadataDto {
    name: String,
    path_display: Option<String>,
    path_lower: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListFolderDto {
    entries: Vec<MetadataDto>,
    has_more: bool,
}

#[async_trait]
impl RemoteStore for DropboxClient {
    async fn metadata(&self, path: &RemotePath) -> DropboxResult<Entry> {
        let started = Instant::now();
        let dto: MetadataDto = self
            .rpc(
                "/2/files/get_metadata",
                &serde_json::json!({ "path": path.as_str() }),
            )
            .await?;
        tracing::debug!(
            path = %path,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Fetched metadata"
        );
        dto.into_entry(path)
    }

    async fn create_folder(
        &self,
        path: &RemotePath,
        autorename: bool,
    ) -> DropboxResult<FolderEntry> {
        let started = Instant::now();
        let dto: CreateFolderDto = self
            .rpc(
                "/2/files/create_folder_v2",
                &serde_json::json!({ "path": path.as_str(), "autorename": autorename }),
            )
            .await?;
        tracing::info!(
            path = %path,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Created folder"
        );

        let created = match dto.metadata.path_display.or(dto.metadata.path_lower) {
            Some(raw) => RemotePath::new(&raw)?,
            None => path.clone(),
        };
        Ok(FolderEntry {
            name: dto.metadata.name,
            path: created,
        })
    }

    async fn list_folder(&self, path: &RemotePath, limit: u32) -> DropboxResult<ListPage> {
        let started = Instant::now();
        let dto: ListFolderDto = self
            .rpc(
                "/2/files/list_folder",
                &serde_json::json!({ "path": path.as_str(), "limit": limit }),
            )
            .await?;
        tracing::debug!(
            path = %path,
            entries = dto.entries.len(),
            has_more = dto.has_more,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Listed folder"
        );

        let mut entries = Vec::with_capacity(dto.entries.len());
        for child in dto.entries {
            let fallback = path.join(&child.name)?;
            entries.push(child.into_entry(&fallback)?);
        }
        Ok(ListPage {
            entries,
            has_more: dto.has_more,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DropboxClient {
        DropboxClient::new("test-token".to_string())
            .unwrap()
            .with_base_url(server.uri())
    }

    #[test]
    fn maps_409_summaries_onto_the_taxonomy() {
        let not_found = map_api_error(409, r#"{"error_summary": "path/not_found/..", "error": {}}"#);
        assert!(matches!(not_found, DropboxError::NotFound(_)));

        let conflict = map_api_error(
            409,
            r#"{"error_summary": "path/conflict/folder/..", "error": {}}"#,
        );
        assert!(matches!(conflict, DropboxError::Conflict(_)));

        let auth = map_api_error(401, "invalid_access_token");
        assert!(matches!(auth, DropboxError::Auth(_)));

        let other = map_api_error(429, r#"{"error_summary": "too_many_requests/.."}"#);
        assert!(matches!(other, DropboxError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn metadata_distinguishes_folders_from_files() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/files/get_metadata"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_partial_json(serde_json::json!({ "path": "/dashboard" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                ".tag": "folder",
                "name": "dashboard",
                "path_lower": "/dashboard",
                "path_display": "/dashboard",
                "id": "id:abc123"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let target = RemotePath::new("/dashboard").unwrap();
        let entry = client.metadata(&target).await.unwrap();
        match entry {
            Entry::Folder(folder) => {
                assert_eq!(folder.name, "dashboard");
                assert_eq!(folder.path.as_str(), "/dashboard");
            }
            other => panic!("expected folder, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn metadata_not_found_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/files/get_metadata"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error_summary": "path/not_found/..",
                "error": { ".tag": "path", "path": { ".tag": "not_found" } }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let target = RemotePath::new("/missing").unwrap();
        let err = client.metadata(&target).await.unwrap_err();
        assert!(matches!(err, DropboxError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_folder_sends_autorename_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/files/create_folder_v2"))
            .and(body_partial_json(serde_json::json!({
                "path": "/dashboard/clients/acme",
                "autorename": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "metadata": {
                    "name": "acme",
                    "path_lower": "/dashboard/clients/acme",
                    "path_display": "/dashboard/clients/acme",
                    "id": "id:def456"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let target = RemotePath::new("/dashboard/clients/acme").unwrap();
        let folder = client.create_folder(&target, false).await.unwrap();
        assert_eq!(folder.name, "acme");
        assert_eq!(folder.path.as_str(), "/dashboard/clients/acme");
    }

    #[tokio::test]
    async fn create_conflict_maps_to_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/files/create_folder_v2"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error_summary": "path/conflict/folder/..",
                "error": { ".tag": "path", "path": { ".tag": "conflict" } }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let target = RemotePath::new("/dashboard").unwrap();
        let err = client.create_folder(&target, false).await.unwrap_err();
        assert!(matches!(err, DropboxError::Conflict(_)));
    }

    #[tokio::test]
    async fn list_folder_reports_has_more() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/files/list_folder"))
            .and(body_partial_json(serde_json::json!({
                "path": "/dashboard/clients",
                "limit": 100
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "entries": [
                    {
                        ".tag": "folder",
                        "name": "acme",
                        "path_lower": "/dashboard/clients/acme",
                        "path_display": "/dashboard/clients/acme"
                    },
                    {
                        ".tag": "file",
                        "name": "intro.mp4",
                        "path_lower": "/dashboard/clients/intro.mp4",
                        "path_display": "/dashboard/clients/intro.mp4",
                        "size": 1048576,
                        "server_modified": "2024-03-01T12:00:00Z"
                    }
                ],
                "cursor": "opaque-cursor",
                "has_more": true
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let target = RemotePath::new("/dashboard/clients").unwrap();
        let page = client.list_folder(&target, 100).await.unwrap();
        assert!(page.has_more);
        assert_eq!(page.entries.len(), 2);
        assert!(page.entries[0].is_folder());
        match &page.entries[1] {
            Entry::File(file) => {
                assert_eq!(file.size, Some(1_048_576));
                assert!(file.is_video());
            }
            other => panic!("expected file, got {:?}", other),
        }
    }
}
