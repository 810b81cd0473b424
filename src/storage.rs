//! Backing stores for containers.
//!
//! A store holds the persisted form of a container: one metadata document per
//! group or dataset, and one raw data object per dataset. Store contents are
//! addressed by [`StoreKey`]s; a [`StorePrefix`] addresses everything below a
//! node. The [`meta_key`] and [`data_key`] helpers map node paths to the keys
//! of the persisted layout.
//!
//! Two stores are provided: [`MemoryStore`](store::MemoryStore) and
//! [`FilesystemStore`](store::FilesystemStore).

pub mod store;
mod store_key;
mod store_prefix;

use std::sync::Arc;

use thiserror::Error;

use crate::node::NodePath;

pub use store_key::{StoreKey, StoreKeyError, StoreKeys};
pub use store_prefix::{StorePrefix, StorePrefixError};

/// The file name of the metadata document persisted for every node.
pub const METADATA_FILE_NAME: &str = "ndstore.json";

/// The file name of the raw data object persisted for every dataset.
pub const DATA_FILE_NAME: &str = "data";

/// Readable storage.
pub trait ReadableStorageTraits: Send + Sync {
    /// Retrieve the value at `key`, or [`None`] if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the underlying storage fails.
    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>, StorageError>;
}

/// Writable storage.
pub trait WritableStorageTraits: Send + Sync {
    /// Store `value` at `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the underlying storage fails.
    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StorageError>;

    /// Erase all keys with the prefix `prefix`. Absent prefixes are not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the underlying storage fails.
    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<(), StorageError>;
}

/// Listable storage.
pub trait ListableStorageTraits: Send + Sync {
    /// Retrieve all keys in the store, sorted.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the underlying storage fails.
    fn list(&self) -> Result<StoreKeys, StorageError>;

    /// Retrieve all keys with the prefix `prefix`, sorted.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the underlying storage fails.
    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError>;
}

/// Readable, writable, and listable storage.
pub trait ReadableWritableListableStorageTraits:
    ReadableStorageTraits + WritableStorageTraits + ListableStorageTraits
{
}

/// [`Arc`] wrapped readable, writable, and listable storage.
pub type ReadableWritableListableStorage = Arc<dyn ReadableWritableListableStorageTraits>;

/// A storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A write operation was attempted on a read only container.
    #[error("a write operation was attempted on a read only container")]
    ReadOnly,
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// An invalid store key.
    #[error(transparent)]
    InvalidStoreKey(#[from] StoreKeyError),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Return the metadata key of the node at `path`.
#[must_use]
pub fn meta_key(path: &NodePath) -> StoreKey {
    node_key(path, METADATA_FILE_NAME)
}

/// Return the data key of the dataset at `path`.
#[must_use]
pub fn data_key(path: &NodePath) -> StoreKey {
    node_key(path, DATA_FILE_NAME)
}

fn node_key(path: &NodePath, file_name: &str) -> StoreKey {
    let path = path.as_str();
    if path.eq("/") {
        unsafe { StoreKey::new_unchecked(file_name.to_string()) }
    } else {
        let path = path.strip_prefix('/').unwrap_or(path);
        unsafe { StoreKey::new_unchecked(format!("{path}/{file_name}")) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_of_root() {
        let path = NodePath::root();
        assert_eq!(meta_key(&path).as_str(), "ndstore.json");
        assert_eq!(data_key(&path).as_str(), "data");
    }

    #[test]
    fn keys_of_nested_node() {
        let path = NodePath::new("/a/b").unwrap();
        assert_eq!(meta_key(&path).as_str(), "a/b/ndstore.json");
        assert_eq!(data_key(&path).as_str(), "a/b/data");
    }
}
