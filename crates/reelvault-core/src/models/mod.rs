//! Data models for the operational tooling
//!
//! Remote paths and directory entries as reported by the cloud storage
//! provider, plus the listing sort and video classification helpers.

mod entry;
mod path;

// Re-export all models for convenient imports
pub use entry::*;
pub use path::*;
