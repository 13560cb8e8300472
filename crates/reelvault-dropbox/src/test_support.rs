//! Mock remote store for testing
//!
//! Allows exercising provisioning and listing logic without network access.
//! Paths are keyed case-insensitively like the provider's namespace, and
//! every call is recorded so tests can assert ordering and counts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reelvault_core::{Entry, FileEntry, FolderEntry, RemotePath};

use crate::error::{DropboxError, DropboxResult};
use crate::traits::{ListPage, RemoteStore};

/// A single recorded call, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Metadata(String),
    CreateFolder { path: String, autorename: bool },
    ListFolder(String),
}

/// In-memory remote store for tests.
#[derive(Clone, Default)]
pub struct MockRemoteStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    require_parents: bool,
    conflict_next_create: Arc<Mutex<bool>>,
    auth_failure: Arc<Mutex<bool>>,
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject creates whose parent folder is absent, like the real provider.
    pub fn with_parent_enforcement(mut self) -> Self {
        self.require_parents = true;
        self
    }

    pub fn add_folder(&self, path: &RemotePath) {
        let entry = Entry::Folder(FolderEntry {
            name: path.name().to_string(),
            path: path.clone(),
        });
        self.entries.lock().unwrap().insert(path.to_lowercase(), entry);
    }

    pub fn add_file(&self, path: &RemotePath, size: u64) {
        let entry = Entry::File(FileEntry {
            name: path.name().to_string(),
            path: path.clone(),
            size: Some(size),
            server_modified: None,
        });
        self.entries.lock().unwrap().insert(path.to_lowercase(), entry);
    }

    /// Make the next create fail with a conflict, as if another actor created
    /// the folder between the caller's lookup and its create.
    pub fn conflict_on_next_create(&self) {
        *self.conflict_next_create.lock().unwrap() = true;
    }

    /// Make every subsequent call fail as if the token were rejected.
    pub fn fail_with_auth_error(&self) {
        *self.auth_failure.lock().unwrap() = true;
    }

    fn check_auth(&self) -> DropboxResult<()> {
        if *self.auth_failure.lock().unwrap() {
            return Err(DropboxError::Auth("invalid_access_token".to_string()));
        }
        Ok(())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, RecordedCall::CreateFolder { .. }))
            .count()
    }

    pub fn contains(&self, path: &RemotePath) -> bool {
        self.entries.lock().unwrap().contains_key(&path.to_lowercase())
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn metadata(&self, path: &RemotePath) -> DropboxResult<Entry> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Metadata(path.to_string()));
        self.check_auth()?;
        self.entries
            .lock()
            .unwrap()
            .get(&path.to_lowercase())
            .cloned()
            .ok_or_else(|| DropboxError::NotFound(format!("path/not_found/{}", path)))
    }

    async fn create_folder(
        &self,
        path: &RemotePath,
        autorename: bool,
    ) -> DropboxResult<FolderEntry> {
        self.calls.lock().unwrap().push(RecordedCall::CreateFolder {
            path: path.to_string(),
            autorename,
        });
        self.check_auth()?;

        {
            let mut conflict = self.conflict_next_create.lock().unwrap();
            if *conflict {
                *conflict = false;
                drop(conflict);
                self.add_folder(path);
                return Err(DropboxError::Conflict(format!("path/conflict/folder/{}", path)));
            }
        }

        if self.require_parents {
            if let Some(parent) = path.parent() {
                if !self.entries.lock().unwrap().contains_key(&parent.to_lowercase()) {
                    return Err(DropboxError::NotFound(format!("path/not_found/{}", parent)));
                }
            }
        }

        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(&path.to_lowercase()) {
            // Renaming is not modeled; an occupied path always conflicts.
            return Err(DropboxError::Conflict(format!("path/conflict/folder/{}", path)));
        }

        let folder = FolderEntry {
            name: path.name().to_string(),
            path: path.clone(),
        };
        entries.insert(path.to_lowercase(), Entry::Folder(folder.clone()));
        Ok(folder)
    }

    async fn list_folder(&self, path: &RemotePath, limit: u32) -> DropboxResult<ListPage> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::ListFolder(path.to_string()));
        self.check_auth()?;

        let entries = self.entries.lock().unwrap();
        if !entries.contains_key(&path.to_lowercase()) {
            return Err(DropboxError::NotFound(format!("path/not_found/{}", path)));
        }

        let prefix = format!("{}/", path.to_lowercase());
        let mut children: Vec<Entry> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix) && !key[prefix.len()..].contains('/'))
            .map(|(_, entry)| entry.clone())
            .collect();
        children.sort_by(|a, b| a.path().as_str().cmp(b.path().as_str()));

        let has_more = children.len() > limit as usize;
        children.truncate(limit as usize);
        Ok(ListPage {
            entries: children,
            has_more,
        })
    }
}
