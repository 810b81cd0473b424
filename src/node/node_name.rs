use derive_more::Display;
use thiserror::Error;

use crate::storage::{DATA_FILE_NAME, METADATA_FILE_NAME};

/// A hierarchy node name.
///
/// The name of a group or dataset within its parent group.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Display)]
pub struct NodeName(String);

/// An invalid node name.
#[derive(Debug, Error)]
#[error("invalid node name {0}")]
pub struct NodeNameError(String);

impl NodeName {
    /// Create a new node name from `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeNameError`] if `name` is not valid according to [`NodeName::validate`].
    pub fn new(name: &str) -> Result<Self, NodeNameError> {
        if Self::validate(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(NodeNameError(name.to_string()))
        }
    }

    /// Extracts a string slice containing the node name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a node name:
    /// - must not be the empty string (`""`),
    /// - must not include the character `/`,
    /// - must not be a string composed only of period characters, e.g. `.` or `..`, and
    /// - must not equal a file name reserved by the persisted layout.
    #[must_use]
    pub fn validate(name: &str) -> bool {
        !name.contains('/')
            && !name.replace('.', "").is_empty()
            && name != METADATA_FILE_NAME
            && name != DATA_FILE_NAME
    }
}

impl TryFrom<&str> for NodeName {
    type Error = NodeNameError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}
