use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::path::RemotePath;
use crate::constants::VIDEO_EXTENSIONS;

/// A folder as reported by the storage provider: canonical path plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub name: String,
    pub path: RemotePath,
}

/// A file as reported by the storage provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: RemotePath,
    pub size: Option<u64>,
    pub server_modified: Option<DateTime<Utc>>,
}

impl FileEntry {
    /// Whether this file counts as a video per the extension allowlist.
    pub fn is_video(&self) -> bool {
        is_video_filename(&self.name)
    }
}

/// A single directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    Folder(FolderEntry),
    File(FileEntry),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Folder(folder) => &folder.name,
            Entry::File(file) => &file.name,
        }
    }

    pub fn path(&self) -> &RemotePath {
        match self {
            Entry::Folder(folder) => &folder.path,
            Entry::File(file) => &file.path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Entry::Folder(_))
    }
}

/// Classify a filename by its final extension against the video allowlist.
///
/// Matching is case-insensitive. Names without an extension (including
/// dotfiles like `.mp4`) are never videos.
pub fn is_video_filename(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_lowercase();
            VIDEO_EXTENSIONS.iter().any(|allowed| *allowed == ext)
        }
        _ => false,
    }
}

/// Sort entries for display: folders before files, each group
/// case-insensitively by name.
pub fn sort_listing(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        b.is_folder()
            .cmp(&a.is_folder())
            .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
    });
}
