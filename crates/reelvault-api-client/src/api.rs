//! Domain methods and response types for the Reelvault API client.

use crate::ApiClient;
use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Invite record returned by POST /api/invites.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct InviteResponse {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub invited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Video record as stored by the application.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VideoRecord {
    pub id: Uuid,
    pub title: String,
    pub client_slug: String,
    pub dropbox_path: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a video record.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NewVideo {
    pub title: String,
    pub client_slug: String,
    pub dropbox_path: String,
}

/// Partial update for a video record. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct VideoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ApiClient {
    /// Health probe. Returns the raw JSON payload.
    pub async fn health(&self) -> Result<serde_json::Value> {
        self.get("/api/health").await
    }

    /// Invite a user by email.
    pub async fn invite_user(&self, email: &str) -> Result<InviteResponse> {
        self.post_json("/api/invites", &serde_json::json!({ "email": email }))
            .await
    }

    /// List all video records.
    pub async fn list_videos(&self) -> Result<Vec<VideoRecord>> {
        self.get("/api/videos").await
    }

    /// Create a video record.
    pub async fn create_video(&self, video: &NewVideo) -> Result<VideoRecord> {
        self.post_json("/api/videos", video).await
    }

    /// Get a single video record by ID.
    pub async fn get_video(&self, id: Uuid) -> Result<VideoRecord> {
        self.get(&format!("/api/videos/{}", id)).await
    }

    /// Apply a partial update to a video record.
    pub async fn update_video(&self, id: Uuid, patch: &VideoPatch) -> Result<VideoRecord> {
        self.patch_json(&format!("/api/videos/{}", id), patch).await
    }

    /// Delete a video record by ID.
    pub async fn delete_video(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("/api/videos/{}", id)).await
    }
}
