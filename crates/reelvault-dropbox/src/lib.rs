//! Dropbox integration for the delivery tree.
//!
//! Defines the `RemoteStore` trait over the provider operations the tooling
//! needs (metadata lookup, folder creation, listing), the HTTP client that
//! implements it, the idempotent folder provisioner, listing/tree discovery
//! helpers, and the OAuth authorization flow.

pub mod client;
pub mod error;
pub mod list;
pub mod oauth;
pub mod provision;
pub mod test_support;
pub mod traits;

pub use client::DropboxClient;
pub use error::{DropboxError, DropboxResult};
pub use list::{list_children, walk, Listing, TreeNode, TreeNodeKind};
pub use oauth::{refresh_access_token, OAuthApp, TokenResponse};
pub use provision::FolderProvisioner;
pub use traits::{ListPage, RemoteStore};
