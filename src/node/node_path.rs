use derive_more::Display;
use thiserror::Error;

use super::NodeName;

/// A hierarchy node path.
///
/// Addresses a group or dataset within a container. The root group is `/`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct NodePath(String);

/// An invalid node path.
#[derive(Debug, Error)]
#[error("invalid node path {0}")]
pub struct NodePathError(String);

impl NodePath {
    /// Create a new node path from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`NodePathError`] if `path` is not valid according to [`NodePath::validate`].
    pub fn new(path: &str) -> Result<Self, NodePathError> {
        if Self::validate(path) {
            Ok(Self(path.to_string()))
        } else {
            Err(NodePathError(path.to_string()))
        }
    }

    /// The root node path.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Extracts a string slice containing the node path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path of the child node named `name`.
    #[must_use]
    pub fn child(&self, name: &NodeName) -> Self {
        if self.0 == "/" {
            Self(format!("/{}", name.as_str()))
        } else {
            Self(format!("{}/{}", self.0, name.as_str()))
        }
    }

    /// Validates a path:
    /// - a path always starts with `/`,
    /// - a non-root path cannot end with `/`, and
    /// - a path cannot contain empty components (a `//` substring).
    #[must_use]
    pub fn validate(path: &str) -> bool {
        path.eq("/") || (path.starts_with('/') && !path.ends_with('/') && !path.contains("//"))
    }
}

impl TryFrom<&str> for NodePath {
    type Error = NodePathError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_path() {
        assert!(NodePath::new("/").is_ok());
        assert!(NodePath::new("/a/b").is_ok());
        assert_eq!(NodePath::new("/a/b").unwrap().to_string(), "/a/b");
        assert!(NodePath::new("/a/b/").is_err());
        assert_eq!(
            NodePath::new("/a/b/").unwrap_err().to_string(),
            "invalid node path /a/b/"
        );
        assert!(NodePath::new("/a//b").is_err());
        assert!(NodePath::new("a/b").is_err());
    }

    #[test]
    fn node_path_child() {
        let name = NodeName::new("b").unwrap();
        assert_eq!(NodePath::root().child(&name).as_str(), "/b");
        assert_eq!(NodePath::new("/a").unwrap().child(&name).as_str(), "/a/b");
    }
}
