//! Shared constants for the delivery tree and media classification.

/// Root folder of the delivery tree.
pub const DASHBOARD_ROOT: &str = "/dashboard";

/// Folder holding one subfolder per client.
pub const CLIENTS_ROOT: &str = "/dashboard/clients";

/// Extensions classified as video content when listing folders.
pub const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "mov", "avi", "wmv", "flv", "webm"];

/// Maximum entries requested per folder listing. Larger folders are truncated.
pub const LIST_PAGE_LIMIT: u32 = 100;
