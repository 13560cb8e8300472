//! Remote store abstraction
//!
//! This module defines the RemoteStore trait covering the provider operations
//! the tooling needs: metadata lookup, folder creation, and folder listing.

use async_trait::async_trait;
use reelvault_core::{Entry, FolderEntry, RemotePath};

use crate::error::DropboxResult;

/// One page of folder listing results, in provider order.
#[derive(Debug, Clone)]
pub struct ListPage {
    pub entries: Vec<Entry>,
    /// True when the folder holds more entries than the requested page.
    pub has_more: bool,
}

/// Remote store abstraction
///
/// Implemented by the HTTP client and by the in-memory mock. Provisioning and
/// listing logic holds an `Arc<dyn RemoteStore>` so it stays independent of
/// the transport.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Look up the entry at `path`.
    ///
    /// Returns `DropboxError::NotFound` when nothing exists there.
    async fn metadata(&self, path: &RemotePath) -> DropboxResult<Entry>;

    /// Create a folder at `path` and return its descriptor.
    ///
    /// With `autorename` disabled the provider rejects an occupied path with
    /// a conflict instead of creating a renamed sibling.
    async fn create_folder(
        &self,
        path: &RemotePath,
        autorename: bool,
    ) -> DropboxResult<FolderEntry>;

    /// List the immediate children of `path`, up to `limit` entries.
    async fn list_folder(&self, path: &RemotePath, limit: u32) -> DropboxResult<ListPage>;
}
