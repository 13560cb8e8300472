//! Platform REST client (Supabase).
//!
//! Used where no direct database connection is available: the SQL execution
//! RPC and storage-bucket management. Every request authenticates with the
//! service-role key through the `apikey` and `Authorization` headers.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// A storage bucket as reported by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketInfo {
    pub id: String,
    pub name: String,
    pub public: bool,
    #[serde(default)]
    pub file_size_limit: Option<i64>,
    #[serde(default)]
    pub allowed_mime_types: Option<Vec<String>>,
}

/// Desired bucket settings for [`PlatformClient::ensure_bucket`].
#[derive(Debug, Clone, Serialize)]
pub struct BucketConfig {
    pub id: String,
    pub name: String,
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mime_types: Option<Vec<String>>,
}

/// REST client for the platform management endpoints.
#[derive(Clone, Debug)]
pub struct PlatformClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl PlatformClient {
    pub fn new(base_url: &str, service_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.service_key.as_str())
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    /// Execute a SQL blob through the `exec_sql` RPC function.
    ///
    /// Unlike the direct connection path there is no transaction here: a
    /// failure can leave earlier statements of the blob applied.
    pub async fn exec_sql(&self, sql: &str) -> Result<()> {
        let started = std::time::Instant::now();
        let url = format!("{}/rest/v1/rpc/exec_sql", self.base_url);
        let request = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "sql": sql }));
        let response = self
            .apply_auth(request)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "SQL execution RPC failed with status {}: {}",
                status,
                error_text
            ));
        }

        tracing::info!(
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "SQL applied via RPC"
        );
        Ok(())
    }

    /// List all storage buckets.
    pub async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let url = format!("{}/storage/v1/bucket", self.base_url);
        let response = self
            .apply_auth(self.client.get(&url))
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Bucket listing failed with status {}: {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse bucket listing")
    }

    /// Fetch a single bucket; `None` when it does not exist.
    pub async fn get_bucket(&self, id: &str) -> Result<Option<BucketInfo>> {
        let url = format!("{}/storage/v1/bucket/{}", self.base_url, id);
        let response = self
            .apply_auth(self.client.get(&url))
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if status.is_success() {
            let bucket = response.json().await.context("Failed to parse bucket")?;
            return Ok(Some(bucket));
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        if status.as_u16() == 404 || error_text.to_lowercase().contains("not found") {
            return Ok(None);
        }
        Err(anyhow::anyhow!(
            "Bucket lookup failed with status {}: {}",
            status,
            error_text
        ))
    }

    /// Create a bucket with the given settings.
    pub async fn create_bucket(&self, config: &BucketConfig) -> Result<()> {
        let url = format!("{}/storage/v1/bucket", self.base_url);
        let request = self.client.post(&url).json(config);
        let response = self
            .apply_auth(request)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Bucket creation failed with status {}: {}",
                status,
                error_text
            ));
        }
        Ok(())
    }

    /// Create a bucket when absent; an existing bucket is left untouched.
    pub async fn ensure_bucket(&self, config: &BucketConfig) -> Result<BucketInfo> {
        if let Some(existing) = self.get_bucket(&config.id).await? {
            tracing::debug!(bucket = %config.id, "Bucket already exists");
            return Ok(existing);
        }

        self.create_bucket(config).await?;
        tracing::info!(bucket = %config.id, public = config.public, "Created bucket");

        self.get_bucket(&config.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Bucket {} missing after creation", config.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn videos_bucket() -> BucketConfig {
        BucketConfig {
            id: "videos".to_string(),
            name: "videos".to_string(),
            public: false,
            file_size_limit: Some(1024 * 1024),
            allowed_mime_types: Some(vec!["video/mp4".to_string()]),
        }
    }

    #[tokio::test]
    async fn exec_sql_posts_the_blob_with_service_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/exec_sql"))
            .and(header("apikey", "service-key"))
            .and(header("Authorization", "Bearer service-key"))
            .and(body_partial_json(
                serde_json::json!({ "sql": "create table t (id int);" }),
            ))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = PlatformClient::new(&server.uri(), "service-key").unwrap();
        client.exec_sql("create table t (id int);").await.unwrap();
    }

    #[tokio::test]
    async fn exec_sql_surfaces_status_and_body_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/exec_sql"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({ "message": "syntax error at or near" })),
            )
            .mount(&server)
            .await;

        let client = PlatformClient::new(&server.uri(), "service-key").unwrap();
        let err = client.exec_sql("create tabel t;").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("syntax error"));
    }

    #[tokio::test]
    async fn ensure_bucket_skips_create_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/storage/v1/bucket/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "videos",
                "name": "videos",
                "public": false,
                "file_size_limit": 1048576,
                "allowed_mime_types": ["video/mp4"]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/bucket"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = PlatformClient::new(&server.uri(), "service-key").unwrap();
        let bucket = client.ensure_bucket(&videos_bucket()).await.unwrap();
        assert_eq!(bucket.id, "videos");
        assert!(!bucket.public);
    }

    #[tokio::test]
    async fn ensure_bucket_creates_when_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/storage/v1/bucket/videos"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "statusCode": "404",
                "error": "Not found",
                "message": "Bucket not found"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/bucket"))
            .and(body_partial_json(serde_json::json!({
                "id": "videos",
                "public": false
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "videos" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/storage/v1/bucket/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "videos",
                "name": "videos",
                "public": false
            })))
            .mount(&server)
            .await;

        let client = PlatformClient::new(&server.uri(), "service-key").unwrap();
        let bucket = client.ensure_bucket(&videos_bucket()).await.unwrap();
        assert_eq!(bucket.id, "videos");
    }
}
