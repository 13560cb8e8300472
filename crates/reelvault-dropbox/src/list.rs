//! Folder listing and tree discovery.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use reelvault_core::constants::LIST_PAGE_LIMIT;
use reelvault_core::{sort_listing, Entry, RemotePath};

use crate::error::DropboxResult;
use crate::traits::RemoteStore;

/// A sorted folder listing.
#[derive(Debug, Clone)]
pub struct Listing {
    pub entries: Vec<Entry>,
    /// True when the folder holds more entries than one page; the remainder
    /// is not fetched.
    pub truncated: bool,
}

/// List the immediate children of `path`, folders first, then files, each
/// group case-insensitively by name.
///
/// Always fetches fresh from the provider. Folders beyond the page limit are
/// reported as truncated and logged, not paginated.
pub async fn list_children(store: &dyn RemoteStore, path: &RemotePath) -> DropboxResult<Listing> {
    let page = store.list_folder(path, LIST_PAGE_LIMIT).await?;
    if page.has_more {
        tracing::warn!(
            path = %path,
            limit = LIST_PAGE_LIMIT,
            "Listing truncated at page limit"
        );
    }

    let mut entries = page.entries;
    sort_listing(&mut entries);
    Ok(Listing {
        entries,
        truncated: page.has_more,
    })
}

/// Entry classification for tree output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeNodeKind {
    Folder,
    Video,
    File,
}

impl Display for TreeNodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TreeNodeKind::Folder => write!(f, "folder"),
            TreeNodeKind::Video => write!(f, "video"),
            TreeNodeKind::File => write!(f, "file"),
        }
    }
}

/// One node of a discovered folder tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub kind: TreeNodeKind,
    pub children: Vec<TreeNode>,
}

/// Walk the tree under `path`, descending up to `max_depth` folder levels.
/// A depth of zero lists nothing.
///
/// One sequential listing per folder; files are classified as video or plain
/// file. Truncated listings surface through the same logging as
/// [`list_children`].
pub fn walk<'a>(
    store: &'a dyn RemoteStore,
    path: &'a RemotePath,
    max_depth: u32,
) -> Pin<Box<dyn Future<Output = DropboxResult<Vec<TreeNode>>> + Send + 'a>> {
    Box::pin(async move {
        if max_depth == 0 {
            return Ok(Vec::new());
        }
        let listing = list_children(store, path).await?;
        let mut nodes = Vec::with_capacity(listing.entries.len());
        for entry in listing.entries {
            match entry {
                Entry::Folder(folder) => {
                    let children = if max_depth > 1 {
                        walk(store, &folder.path, max_depth - 1).await?
                    } else {
                        Vec::new()
                    };
                    nodes.push(TreeNode {
                        name: folder.name,
                        path: folder.path.to_string(),
                        kind: TreeNodeKind::Folder,
                        children,
                    });
                }
                Entry::File(file) => {
                    let kind = if file.is_video() {
                        TreeNodeKind::Video
                    } else {
                        TreeNodeKind::File
                    };
                    nodes.push(TreeNode {
                        name: file.name,
                        path: file.path.to_string(),
                        kind,
                        children: Vec::new(),
                    });
                }
            }
        }
        Ok(nodes)
    })
}
