//! Reelvault Core Library
//!
//! This crate provides the domain models, configuration, and constants shared
//! by the operational tooling: remote paths and directory entries as the
//! storage provider reports them, the environment-driven configuration, and
//! the fixed classification/tree constants.

pub mod config;
pub mod constants;
pub mod models;

// Re-export commonly used types
pub use config::{ApiSettings, DatabaseSettings, DropboxCredentials, DropboxSettings, OpsConfig};
pub use models::{
    is_video_filename, sort_listing, Entry, FileEntry, FolderEntry, InvalidRemotePath, RemotePath,
};
