use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote path validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidRemotePath {
    #[error("Remote path is empty")]
    Empty,

    #[error("Remote path has an empty segment: {0}")]
    EmptySegment(String),

    #[error("Remote path segment is not allowed: {0}")]
    InvalidSegment(String),
}

/// An absolute, slash-delimited path in the provider's namespace.
///
/// Construction normalizes the raw string: exactly one leading slash, no
/// trailing slash, no empty segments. The provider treats paths
/// case-insensitively, so comparisons should go through [`RemotePath::to_lowercase`];
/// the stored form preserves the case it was built with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RemotePath(String);

impl RemotePath {
    /// Parse and normalize a remote path.
    ///
    /// `"dashboard/"` and `"/dashboard"` produce the same path. The bare root
    /// `"/"` is rejected: every path must name at least one folder.
    pub fn new(raw: &str) -> Result<Self, InvalidRemotePath> {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(InvalidRemotePath::Empty);
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            validate_segment(segment, raw)?;
            segments.push(segment);
        }

        Ok(RemotePath(format!("/{}", segments.join("/"))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment (the display name of the entry).
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Parent path, or `None` for a top-level path like `/dashboard`.
    pub fn parent(&self) -> Option<RemotePath> {
        let idx = self.0.rfind('/')?;
        if idx == 0 {
            return None;
        }
        Some(RemotePath(self.0[..idx].to_string()))
    }

    /// Append one segment to the path.
    pub fn join(&self, segment: &str) -> Result<RemotePath, InvalidRemotePath> {
        let segment = segment.trim();
        if segment.contains('/') {
            return Err(InvalidRemotePath::InvalidSegment(segment.to_string()));
        }
        validate_segment(segment, segment)?;
        Ok(RemotePath(format!("{}/{}", self.0, segment)))
    }

    /// All prefixes of this path from the top-level folder down to the path
    /// itself, in provisioning order.
    pub fn ancestors(&self) -> Vec<RemotePath> {
        let mut paths = Vec::new();
        let mut current = String::new();
        for segment in self.0[1..].split('/') {
            current.push('/');
            current.push_str(segment);
            paths.push(RemotePath(current.clone()));
        }
        paths
    }

    /// Lowercased form for comparisons in the provider's case-insensitive namespace.
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

fn validate_segment(segment: &str, raw: &str) -> Result<(), InvalidRemotePath> {
    if segment.is_empty() {
        return Err(InvalidRemotePath::EmptySegment(raw.to_string()));
    }
    if segment == "." || segment == ".." {
        return Err(InvalidRemotePath::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

impl Display for RemotePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RemotePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        RemotePath::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_leading_and_trailing_slashes() {
        assert_eq!(
            RemotePath::new("dashboard/").unwrap(),
            RemotePath::new("/dashboard").unwrap()
        );
        assert_eq!(RemotePath::new("  /dashboard  ").unwrap().as_str(), "/dashboard");
    }

    #[test]
    fn rejects_empty_and_root() {
        assert_eq!(RemotePath::new(""), Err(InvalidRemotePath::Empty));
        assert_eq!(RemotePath::new("/"), Err(InvalidRemotePath::Empty));
        assert_eq!(RemotePath::new("   "), Err(InvalidRemotePath::Empty));
    }

    #[test]
    fn rejects_empty_and_dot_segments() {
        assert!(matches!(
            RemotePath::new("/a//b"),
            Err(InvalidRemotePath::EmptySegment(_))
        ));
        assert!(matches!(
            RemotePath::new("/a/../b"),
            Err(InvalidRemotePath::InvalidSegment(_))
        ));
    }

    #[test]
    fn name_and_parent() {
        let path = RemotePath::new("/dashboard/clients/acme").unwrap();
        assert_eq!(path.name(), "acme");
        assert_eq!(path.parent().unwrap().as_str(), "/dashboard/clients");

        let top = RemotePath::new("/dashboard").unwrap();
        assert_eq!(top.name(), "dashboard");
        assert!(top.parent().is_none());
    }

    #[test]
    fn join_validates_segments() {
        let base = RemotePath::new("/dashboard/clients").unwrap();
        assert_eq!(base.join("acme").unwrap().as_str(), "/dashboard/clients/acme");
        assert!(base.join("a/b").is_err());
        assert!(base.join("..").is_err());
        assert!(base.join("").is_err());
    }

    #[test]
    fn ancestors_are_ordered_top_down() {
        let path = RemotePath::new("/a/b/c").unwrap();
        let ancestors: Vec<String> = path
            .ancestors()
            .into_iter()
            .map(|p| p.as_str().to_string())
            .collect();
        assert_eq!(ancestors, vec!["/a", "/a/b", "/a/b/c"]);
    }

    #[test]
    fn case_is_preserved_but_comparable() {
        let path = RemotePath::new("/Dashboard/Clients").unwrap();
        assert_eq!(path.as_str(), "/Dashboard/Clients");
        assert_eq!(path.to_lowercase(), "/dashboard/clients");
    }

    #[test]
    fn deserializes_with_validation() {
        let path: RemotePath = serde_json::from_str("\"/dashboard\"").unwrap();
        assert_eq!(path.as_str(), "/dashboard");
        assert!(serde_json::from_str::<RemotePath>("\"//\"").is_err());
    }
}
