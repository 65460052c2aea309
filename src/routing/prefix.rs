//! Mount prefix matching and path rewriting.
//!
//! # Design Decisions
//! - Matching is per path segment: `/api` matches `/api` and `/api/...`, never `/apix`
//! - The prefix is removed exactly once; later occurrences are left alone
//! - No percent-decoding or slash normalization, the remainder is sent as-is

use axum::http::uri::PathAndQuery;
use axum::http::Uri;

/// The public path prefix under which the upstream is exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPrefix {
    prefix: String,
}

impl MountPrefix {
    /// Create a mount prefix. Expects a validated prefix such as `/api`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` lies under this prefix.
    pub fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }

    /// Remove the prefix from `path`, returning the upstream path.
    ///
    /// Returns `None` when the path is outside the mount. An exact match maps to `/`.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() {
            Some("/")
        } else if rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Rewrite an inbound URI into the upstream path and query.
    ///
    /// The query string is appended verbatim.
    pub fn rewrite(&self, uri: &Uri) -> Option<PathAndQuery> {
        let path = self.strip(uri.path())?;
        join_path_and_query(path, uri.query())
    }
}

/// Build a `PathAndQuery` from raw parts without touching their encoding.
pub fn join_path_and_query(path: &str, query: Option<&str>) -> Option<PathAndQuery> {
    let joined = match query {
        Some(q) => format!("{}?{}", path, q),
        None => path.to_string(),
    };
    PathAndQuery::try_from(joined).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix() {
        let prefix = MountPrefix::new("/api");
        assert_eq!(prefix.strip("/api/users/42"), Some("/users/42"));
        assert_eq!(prefix.strip("/api"), Some("/"));
        assert_eq!(prefix.strip("/api/"), Some("/"));
        assert_eq!(prefix.strip("/apix"), None);
        assert_eq!(prefix.strip("/other/api"), None);
        assert_eq!(prefix.strip("/"), None);
    }

    #[test]
    fn test_strip_only_once() {
        let prefix = MountPrefix::new("/api");
        assert_eq!(prefix.strip("/api/api/v1/api"), Some("/api/v1/api"));
    }

    #[test]
    fn test_no_normalization() {
        let prefix = MountPrefix::new("/api");
        assert_eq!(prefix.strip("/api//a/%2F/../b/"), Some("//a/%2F/../b/"));
    }

    #[test]
    fn test_rewrite_keeps_query_verbatim() {
        let prefix = MountPrefix::new("/api");
        let uri: Uri = "/api/users/42?role=admin&x=%20y".parse().unwrap();
        let rewritten = prefix.rewrite(&uri).unwrap();
        assert_eq!(rewritten.as_str(), "/users/42?role=admin&x=%20y");

        let uri: Uri = "/api?q=1".parse().unwrap();
        assert_eq!(prefix.rewrite(&uri).unwrap().as_str(), "/?q=1");
    }

    #[test]
    fn test_rewrite_outside_mount() {
        let prefix = MountPrefix::new("/api");
        let uri: Uri = "/openapi.json".parse().unwrap();
        assert!(prefix.rewrite(&uri).is_none());
    }
}
