//! Container files.
//!
//! A [`File`] is the root of a container hierarchy backed by a
//! [store](crate::storage). It is opened in one of two [`OpenMode`]s: `Create`
//! truncates the backing store and starts a fresh container, `ReadExisting`
//! opens a previously persisted container read only.
//!
//! A `File` owns everything opened beneath it. [`Group`] and
//! [`Dataset`](crate::dataset::Dataset) handles borrow from the file and are
//! only valid while it is open: once the file is [closed](File::close) (or
//! dropped), any operation through a previously obtained handle fails with
//! [`InvalidHandleError`].

use std::sync::Arc;

use thiserror::Error;

use crate::{
    group::Group,
    metadata::{GroupMetadata, NodeMetadata},
    node::NodePath,
    storage::{
        meta_key, ReadableWritableListableStorage, StorageError, StorePrefix, METADATA_FILE_NAME,
    },
};

/// The mode in which to open a container.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum OpenMode {
    /// Create a fresh container, truncating any prior contents of the backing store.
    Create,
    /// Open an existing container read only.
    ReadExisting,
}

/// An invalid handle error.
///
/// Returned when a group or dataset handle is used after the container it was
/// obtained from was closed.
#[derive(Copy, Clone, Debug, Error)]
#[error("the owning container has been closed")]
pub struct InvalidHandleError;

/// A container open error.
#[derive(Debug, Error)]
pub enum FileOpenError {
    /// No container exists in the backing store.
    #[error("no container found in the backing store")]
    NotFound,
    /// The persisted container is structurally invalid.
    #[error("corrupt container: {0}")]
    Corrupt(String),
    /// Storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
}

pub(crate) struct FileInner {
    storage: ReadableWritableListableStorage,
    readonly: bool,
}

impl FileInner {
    pub(crate) fn storage(&self) -> &ReadableWritableListableStorage {
        &self.storage
    }

    pub(crate) fn writable(&self) -> Result<(), StorageError> {
        if self.readonly {
            Err(StorageError::ReadOnly)
        } else {
            Ok(())
        }
    }
}

/// An open container file: the root of a hierarchy of groups and datasets.
pub struct File {
    inner: Arc<FileInner>,
}

impl File {
    /// Open a container in `storage`.
    ///
    /// With [`OpenMode::Create`], any prior contents of the store are erased
    /// and fresh root metadata is written. With [`OpenMode::ReadExisting`],
    /// the persisted container is validated and opened read only.
    ///
    /// # Errors
    ///
    /// Returns [`FileOpenError::NotFound`] if `ReadExisting` finds no root
    /// metadata, [`FileOpenError::Corrupt`] if any persisted metadata document
    /// is structurally invalid, or a storage error.
    pub fn open(
        storage: ReadableWritableListableStorage,
        mode: OpenMode,
    ) -> Result<Self, FileOpenError> {
        match mode {
            OpenMode::Create => {
                storage.erase_prefix(&StorePrefix::root())?;
                let metadata = NodeMetadata::Group(GroupMetadata::new());
                storage.set(&meta_key(&NodePath::root()), &metadata.to_json_vec()?)?;
                Ok(Self {
                    inner: Arc::new(FileInner {
                        storage,
                        readonly: false,
                    }),
                })
            }
            OpenMode::ReadExisting => {
                let Some(root) = storage.get(&meta_key(&NodePath::root()))? else {
                    return Err(FileOpenError::NotFound);
                };
                let root: NodeMetadata = serde_json::from_slice(&root)
                    .map_err(|err| FileOpenError::Corrupt(err.to_string()))?;
                if !matches!(root, NodeMetadata::Group(_)) {
                    return Err(FileOpenError::Corrupt(
                        "the root node is not a group".to_string(),
                    ));
                }
                validate_metadata(&storage)?;
                Ok(Self {
                    inner: Arc::new(FileInner {
                        storage,
                        readonly: true,
                    }),
                })
            }
        }
    }

    /// The root group of the container.
    #[must_use]
    pub fn root(&self) -> Group {
        Group::new(Arc::downgrade(&self.inner), NodePath::root())
    }

    /// Returns true if the container was opened read only.
    #[must_use]
    pub fn readonly(&self) -> bool {
        self.inner.readonly
    }

    /// Close the container.
    ///
    /// All writes are persisted as they are made, so closing only invalidates
    /// the handles obtained from this file: any later operation through one of
    /// them fails with [`InvalidHandleError`]. Dropping the file without
    /// calling `close` has the same effect.
    pub fn close(self) {
        drop(self);
    }
}

/// Check that every persisted metadata document parses and carries a
/// supported format version.
fn validate_metadata(storage: &ReadableWritableListableStorage) -> Result<(), FileOpenError> {
    for key in storage.list()? {
        let is_metadata = key
            .as_str()
            .rsplit('/')
            .next()
            .is_some_and(|file_name| file_name == METADATA_FILE_NAME);
        if !is_metadata {
            continue;
        }
        let Some(bytes) = storage.get(&key)? else {
            continue;
        };
        let metadata: NodeMetadata = serde_json::from_slice(&bytes)
            .map_err(|err| FileOpenError::Corrupt(format!("{key}: {err}")))?;
        metadata
            .validate_format()
            .map_err(|err| FileOpenError::Corrupt(format!("{key}: {err}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::storage::store::MemoryStore;
    use crate::storage::{ReadableStorageTraits, WritableStorageTraits};

    use super::*;

    #[test]
    fn open_create_truncates() {
        let store = Arc::new(MemoryStore::new());
        store.set(&"stale/key".try_into().unwrap(), &[0]).unwrap();
        let file = File::open(store.clone(), OpenMode::Create).unwrap();
        assert!(!file.readonly());
        assert!(store.get(&"stale/key".try_into().unwrap()).unwrap().is_none());
        assert!(store
            .get(&meta_key(&NodePath::root()))
            .unwrap()
            .is_some());
    }

    #[test]
    fn open_existing_not_found() {
        let store = Arc::new(MemoryStore::new());
        assert!(matches!(
            File::open(store, OpenMode::ReadExisting),
            Err(FileOpenError::NotFound)
        ));
    }

    #[test]
    fn open_existing_corrupt() {
        let store = Arc::new(MemoryStore::new());
        File::open(store.clone(), OpenMode::Create).unwrap().close();
        store
            .set(&meta_key(&NodePath::root()), b"not json")
            .unwrap();
        assert!(matches!(
            File::open(store, OpenMode::ReadExisting),
            Err(FileOpenError::Corrupt(_))
        ));
    }

    #[test]
    fn open_existing_unsupported_format() {
        let store = Arc::new(MemoryStore::new());
        File::open(store.clone(), OpenMode::Create).unwrap().close();
        store
            .set(
                &meta_key(&NodePath::root()),
                br#"{"node_type": "group", "ndstore_format": 99}"#,
            )
            .unwrap();
        assert!(matches!(
            File::open(store, OpenMode::ReadExisting),
            Err(FileOpenError::Corrupt(_))
        ));
    }

    #[test]
    fn close_invalidates_handles() {
        let store = Arc::new(MemoryStore::new());
        let file = File::open(store, OpenMode::Create).unwrap();
        let root = file.root();
        file.close();
        assert!(matches!(
            root.create_group("g"),
            Err(crate::group::GroupCreateError::InvalidHandle(_))
        ));
    }

    #[test]
    fn reopen_is_readonly() {
        let store = Arc::new(MemoryStore::new());
        File::open(store.clone(), OpenMode::Create).unwrap().close();
        let file = File::open(store, OpenMode::ReadExisting).unwrap();
        assert!(file.readonly());
    }
}
