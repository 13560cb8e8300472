//! Idempotent folder provisioning.

use std::sync::Arc;

use reelvault_core::{Entry, FolderEntry, RemotePath};

use crate::error::{DropboxError, DropboxResult};
use crate::traits::RemoteStore;

/// Ensures folders exist in the remote delivery tree.
///
/// Provisioning is lookup-first: an existing folder is returned untouched and
/// only a missing path triggers a create. Auto-rename stays disabled on
/// create, so losing a race (or hitting a leftover entry) surfaces as
/// [`DropboxError::Conflict`] instead of silently producing a renamed
/// sibling.
pub struct FolderProvisioner {
    store: Arc<dyn RemoteStore>,
}

impl FolderProvisioner {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Ensure a folder exists at `path`, creating it when absent.
    ///
    /// Returns the provider's descriptor for the folder. Performs at most one
    /// create call and never deletes or renames anything. A file occupying
    /// the path is a conflict: it cannot be provisioned as a folder.
    pub async fn ensure_folder(&self, path: &RemotePath) -> DropboxResult<FolderEntry> {
        match self.store.metadata(path).await {
            Ok(Entry::Folder(folder)) => {
                tracing::debug!(path = %path, "Folder already exists");
                Ok(folder)
            }
            Ok(Entry::File(file)) => Err(DropboxError::Conflict(format!(
                "a file already occupies {}",
                file.path
            ))),
            Err(DropboxError::NotFound(_)) => {
                let folder = self.store.create_folder(path, false).await?;
                tracing::info!(path = %folder.path, "Created folder");
                Ok(folder)
            }
            Err(err) => Err(err),
        }
    }

    /// Ensure `path` and all of its ancestors exist, top-down.
    ///
    /// Each level is an independent remote round-trip; a failure part-way
    /// leaves the levels already provisioned in place.
    pub async fn ensure_path(&self, path: &RemotePath) -> DropboxResult<FolderEntry> {
        let ancestors = path.ancestors();
        for ancestor in &ancestors[..ancestors.len() - 1] {
            self.ensure_folder(ancestor).await?;
        }
        self.ensure_folder(path).await
    }
}
