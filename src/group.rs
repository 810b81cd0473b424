//! Container groups.
//!
//! A group is a named scope in a container hierarchy. Groups nest arbitrarily
//! and own named [datasets](crate::dataset::Dataset). The root group is
//! obtained from [`File::root`](crate::file::File::root).

use std::sync::Weak;

use derive_more::Display;
use thiserror::Error;

use crate::{
    dataset::{Dataset, DatasetCreateError, DatasetOpenError, DatasetShape, TypeDescriptor},
    file::{FileInner, InvalidHandleError},
    metadata::{GroupMetadata, NodeMetadata},
    node::{NodeName, NodeNameError, NodePath},
    storage::{meta_key, StorageError},
};

/// A group within an open container.
///
/// A group handle is valid only while its owning [`File`](crate::file::File)
/// is open; afterwards every operation fails with [`InvalidHandleError`].
#[derive(Clone, Debug, Display)]
#[display("group {path}")]
pub struct Group {
    file: Weak<FileInner>,
    path: NodePath,
}

/// A group creation error.
#[derive(Debug, Error)]
pub enum GroupCreateError {
    /// A node with this name already exists in the parent group.
    #[error("a node already exists at {0}")]
    DuplicateName(NodePath),
    /// An invalid node name.
    #[error(transparent)]
    NodeNameError(#[from] NodeNameError),
    /// The owning container has been closed.
    #[error(transparent)]
    InvalidHandle(#[from] InvalidHandleError),
    /// Storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
}

/// A group open error.
#[derive(Debug, Error)]
pub enum GroupOpenError {
    /// No group with this name exists in the parent group.
    #[error("no group found at {0}")]
    NotFound(NodePath),
    /// The node at this path is not a group.
    #[error("the node at {0} is not a group")]
    NotAGroup(NodePath),
    /// The persisted group metadata is structurally invalid.
    #[error("corrupt metadata for {0}: {1}")]
    Corrupt(NodePath, String),
    /// An invalid node name.
    #[error(transparent)]
    NodeNameError(#[from] NodeNameError),
    /// The owning container has been closed.
    #[error(transparent)]
    InvalidHandle(#[from] InvalidHandleError),
    /// Storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
}

impl Group {
    pub(crate) fn new(file: Weak<FileInner>, path: NodePath) -> Self {
        Self { file, path }
    }

    /// The path of the group in the container.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    fn inner(&self) -> Result<std::sync::Arc<FileInner>, InvalidHandleError> {
        self.file.upgrade().ok_or(InvalidHandleError)
    }

    /// Create a child group named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GroupCreateError::DuplicateName`] if a node named `name`
    /// already exists in this group, or an error if the name is invalid, the
    /// container is closed or read only, or storage fails.
    pub fn create_group(&self, name: &str) -> Result<Group, GroupCreateError> {
        let file = self.inner()?;
        file.writable()?;
        let name = NodeName::new(name)?;
        let path = self.path.child(&name);
        if file.storage().get(&meta_key(&path))?.is_some() {
            return Err(GroupCreateError::DuplicateName(path));
        }
        let metadata = NodeMetadata::Group(GroupMetadata::new());
        file.storage().set(&meta_key(&path), &metadata.to_json_vec()?)?;
        Ok(Group::new(self.file.clone(), path))
    }

    /// Open the child group named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GroupOpenError::NotFound`] if no node named `name` exists in
    /// this group, [`GroupOpenError::NotAGroup`] if the node is a dataset, or
    /// an error if the metadata is corrupt, the container is closed, or
    /// storage fails.
    pub fn open_group(&self, name: &str) -> Result<Group, GroupOpenError> {
        let file = self.inner()?;
        let name = NodeName::new(name)?;
        let path = self.path.child(&name);
        let Some(bytes) = file.storage().get(&meta_key(&path))? else {
            return Err(GroupOpenError::NotFound(path));
        };
        let metadata: NodeMetadata = serde_json::from_slice(&bytes)
            .map_err(|err| GroupOpenError::Corrupt(path.clone(), err.to_string()))?;
        metadata
            .validate_format()
            .map_err(|err| GroupOpenError::Corrupt(path.clone(), err.to_string()))?;
        match metadata {
            NodeMetadata::Group(_) => Ok(Group::new(self.file.clone(), path)),
            NodeMetadata::Dataset(_) => Err(GroupOpenError::NotAGroup(path)),
        }
    }

    /// Create a dataset named `name` with the given shape and element type.
    ///
    /// A `Native` byte-order tag on `descriptor` is resolved to the concrete
    /// order of the executing machine before the dataset type is persisted.
    /// The dataset contents are zero initialised.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetCreateError::DuplicateName`] if a node named `name`
    /// already exists in this group, [`DatasetCreateError::InvalidShape`] if
    /// `shape` is empty or has a zero extent, or an error if the name is
    /// invalid, the container is closed or read only, or storage fails.
    pub fn create_dataset(
        &self,
        name: &str,
        shape: DatasetShape,
        descriptor: TypeDescriptor,
    ) -> Result<Dataset, DatasetCreateError> {
        let file = self.inner()?;
        let name = NodeName::new(name)?;
        let path = self.path.child(&name);
        Dataset::create(&file, shape, descriptor, path)
    }

    /// Open the dataset named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetOpenError::NotFound`] if no node named `name` exists
    /// in this group, [`DatasetOpenError::NotADataset`] if the node is a
    /// group, or an error if the metadata is corrupt, the container is
    /// closed, or storage fails.
    pub fn open_dataset(&self, name: &str) -> Result<Dataset, DatasetOpenError> {
        let file = self.inner()?;
        let name = NodeName::new(name)?;
        let path = self.path.child(&name);
        Dataset::open(&file, path)
    }
}
