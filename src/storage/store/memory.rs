//! An in-memory store.

use parking_lot::RwLock;

use crate::storage::{
    ListableStorageTraits, ReadableStorageTraits, ReadableWritableListableStorageTraits,
    StorageError, StoreKey, StoreKeys, StorePrefix, WritableStorageTraits,
};

use std::collections::BTreeMap;

/// An in-memory store.
///
/// Containers backed by a memory store persist only as long as the store
/// itself; reopening requires handing the same store to [`File::open`](crate::file::File::open)
/// again.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data_map: RwLock<BTreeMap<StoreKey, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadableStorageTraits for MemoryStore {
    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>, StorageError> {
        let data_map = self.data_map.read();
        Ok(data_map.get(key).cloned())
    }
}

impl WritableStorageTraits for MemoryStore {
    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StorageError> {
        let mut data_map = self.data_map.write();
        data_map.insert(key.clone(), value.to_vec());
        Ok(())
    }

    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<(), StorageError> {
        let mut data_map = self.data_map.write();
        data_map.retain(|key, _| !key.has_prefix(prefix));
        Ok(())
    }
}

impl ListableStorageTraits for MemoryStore {
    fn list(&self) -> Result<StoreKeys, StorageError> {
        let data_map = self.data_map.read();
        Ok(data_map.keys().cloned().collect())
    }

    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        let data_map = self.data_map.read();
        Ok(data_map
            .keys()
            .filter(|&key| key.has_prefix(prefix))
            .cloned()
            .collect())
    }
}

impl ReadableWritableListableStorageTraits for MemoryStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn memory_set_get() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let key = "a/b".try_into()?;
        store.set(&key, &[0, 1, 2])?;
        assert_eq!(store.get(&key)?, Some(vec![0, 1, 2]));
        store.set(&key, &[3, 4])?;
        assert_eq!(store.get(&key)?, Some(vec![3, 4]));
        assert_eq!(store.get(&"a/c".try_into()?)?, None);
        Ok(())
    }

    #[test]
    fn memory_list() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        store.set(&"a/b".try_into()?, &[])?;
        store.set(&"a/c".try_into()?, &[])?;
        store.set(&"a/d/e".try_into()?, &[])?;
        assert_eq!(
            store.list()?,
            &["a/b".try_into()?, "a/c".try_into()?, "a/d/e".try_into()?]
        );
        assert_eq!(
            store.list_prefix(&"a/d/".try_into()?)?,
            &["a/d/e".try_into()?]
        );
        Ok(())
    }

    #[test]
    fn memory_erase_prefix() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        store.set(&"a/b".try_into()?, &[])?;
        store.set(&"a/d/e".try_into()?, &[])?;
        store.set(&"b/c".try_into()?, &[])?;
        store.erase_prefix(&"a/".try_into()?)?;
        assert_eq!(store.list()?, &["b/c".try_into()?]);
        store.erase_prefix(&StorePrefix::root())?;
        assert!(store.list()?.is_empty());
        Ok(())
    }
}
