//! A filesystem store.

use crate::storage::{
    ListableStorageTraits, ReadableStorageTraits, ReadableWritableListableStorageTraits,
    StorageError, StoreKey, StoreKeyError, StoreKeys, StorePrefix, WritableStorageTraits,
};

use thiserror::Error;
use walkdir::WalkDir;

use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
    path::{Path, PathBuf},
};

/// A filesystem store.
///
/// Maps each [`StoreKey`] to the file at the same relative path under a base
/// directory, so a container persists across processes.
#[derive(Debug)]
pub struct FilesystemStore {
    base_directory: PathBuf,
}

/// A filesystem store creation error.
#[derive(Debug, Error)]
pub enum FilesystemStoreCreateError {
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// The base directory is not valid.
    #[error("base directory {0} is not valid")]
    InvalidBaseDirectory(PathBuf),
    /// The base directory points to an existing file.
    #[error("base directory {0} is an existing file")]
    ExistingFile(PathBuf),
}

impl FilesystemStore {
    /// Create a new filesystem store at `base_directory`.
    /// The base directory is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`FilesystemStoreCreateError`] if `base_directory` is not
    /// valid or points to an existing file rather than a directory.
    pub fn new<P: AsRef<Path>>(
        base_directory: P,
    ) -> Result<FilesystemStore, FilesystemStoreCreateError> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if base_directory.to_str().is_none() {
            return Err(FilesystemStoreCreateError::InvalidBaseDirectory(
                base_directory,
            ));
        }
        if base_directory.is_file() {
            return Err(FilesystemStoreCreateError::ExistingFile(base_directory));
        }
        if !base_directory.is_dir() {
            std::fs::create_dir_all(&base_directory)?;
        }
        Ok(FilesystemStore { base_directory })
    }

    /// Maps a [`StoreKey`] to a filesystem [`PathBuf`].
    #[must_use]
    pub fn key_to_fspath(&self, key: &StoreKey) -> PathBuf {
        self.base_directory.join(key.as_str())
    }

    /// Maps a filesystem path to a [`StoreKey`].
    fn fspath_to_key(&self, path: &Path) -> Result<StoreKey, StoreKeyError> {
        let key = pathdiff::diff_paths(path, &self.base_directory)
            .and_then(|diff| diff.to_str().map(str::to_string))
            .ok_or_else(|| StoreKeyError::from(path.to_string_lossy().to_string()))?;
        StoreKey::new(key)
    }
}

impl ReadableStorageTraits for FilesystemStore {
    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>, StorageError> {
        let mut file = match File::open(self.key_to_fspath(key)) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(Some(buffer))
    }
}

impl WritableStorageTraits for FilesystemStore {
    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StorageError> {
        let path = self.key_to_fspath(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.write_all(value)?;
        Ok(())
    }

    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<(), StorageError> {
        if prefix.as_str().is_empty() {
            for entry in std::fs::read_dir(&self.base_directory)? {
                let entry = entry?;
                if entry.file_type()?.is_dir() {
                    std::fs::remove_dir_all(entry.path())?;
                } else {
                    std::fs::remove_file(entry.path())?;
                }
            }
        } else {
            let path = self.base_directory.join(prefix.as_str());
            if path.is_dir() {
                std::fs::remove_dir_all(path)?;
            }
        }
        Ok(())
    }
}

impl ListableStorageTraits for FilesystemStore {
    fn list(&self) -> Result<StoreKeys, StorageError> {
        self.list_prefix(&StorePrefix::root())
    }

    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        let path = self.base_directory.join(prefix.as_str());
        if !path.is_dir() {
            return Ok(vec![]);
        }
        let mut keys: StoreKeys = WalkDir::new(path)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| self.fspath_to_key(entry.path()))
            .collect::<Result<_, _>>()?;
        keys.sort();
        Ok(keys)
    }
}

impl ReadableWritableListableStorageTraits for FilesystemStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn filesystem_set_get() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        let store = FilesystemStore::new(path.path())?;
        let key = "a/b".try_into()?;
        store.set(&key, &[0, 1, 2])?;
        assert_eq!(store.get(&key)?, Some(vec![0, 1, 2]));
        assert_eq!(store.get(&"a/c".try_into()?)?, None);
        Ok(())
    }

    #[test]
    fn filesystem_list() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        let store = FilesystemStore::new(path.path())?;
        store.set(&"a/b".try_into()?, &[])?;
        store.set(&"a/c/d".try_into()?, &[])?;
        assert_eq!(store.list()?, &["a/b".try_into()?, "a/c/d".try_into()?]);
        assert_eq!(
            store.list_prefix(&"a/c/".try_into()?)?,
            &["a/c/d".try_into()?]
        );
        assert!(store.list_prefix(&"z/".try_into()?)?.is_empty());
        Ok(())
    }

    #[test]
    fn filesystem_erase_prefix() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        let store = FilesystemStore::new(path.path())?;
        store.set(&"a/b".try_into()?, &[])?;
        store.set(&"c".try_into()?, &[])?;
        store.erase_prefix(&"a/".try_into()?)?;
        assert_eq!(store.list()?, &["c".try_into()?]);
        store.erase_prefix(&StorePrefix::root())?;
        assert!(store.list()?.is_empty());
        Ok(())
    }

    #[test]
    fn filesystem_existing_file() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        let file_path = path.path().join("file");
        std::fs::write(&file_path, [0])?;
        assert!(FilesystemStore::new(&file_path).is_err());
        Ok(())
    }
}
