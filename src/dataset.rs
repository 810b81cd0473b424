//! Container datasets.
//!
//! A dataset is a named, fixed-shape dense array of elements of one declared
//! type, stored under a group. The declared type is a [`TypeDescriptor`]: a
//! logical [`DataType`] plus a [`ByteOrder`]. A `Native` order tag is resolved
//! to the concrete order of the executing machine when the dataset is created,
//! so the persisted type always carries a concrete [`Endianness`].
//!
//! [`write`](Dataset::write) and [`read`](Dataset::read) convert between the
//! persisted byte order and the caller's requested in-memory order. The
//! conversion is a pure byte-order transform: when the source and target
//! logical kinds differ but their widths match, the byte pattern of each
//! element is reinterpreted verbatim at the target kind, never numerically
//! cast. Writing `i32` values through a native-integer view into a
//! [`Float32`](DataType::Float32) dataset and reading them back as `i32`
//! recovers the original values exactly, whatever byte-order conversions were
//! applied in between.

mod byte_order;
mod data_type;
mod element;
mod type_descriptor;

use std::sync::{Arc, Weak};

use derive_more::Display;
use thiserror::Error;

pub use byte_order::{ByteOrder, Endianness, NATIVE_ENDIAN};
pub use data_type::{DataType, UnsupportedDataTypeError};
pub use element::Element;
pub use type_descriptor::TypeDescriptor;

use byte_order::reverse_endianness;

use crate::{
    file::{FileInner, InvalidHandleError},
    metadata::{DatasetMetadata, NodeMetadata},
    node::{NodeNameError, NodePath},
    storage::{data_key, meta_key, StorageError},
};

/// The shape of a dataset: one extent per dimension.
pub type DatasetShape = Vec<u64>;

/// A dataset within an open container.
///
/// A dataset handle is valid only while its owning [`File`](crate::file::File)
/// is open; afterwards every operation fails with [`InvalidHandleError`].
#[derive(Clone, Debug, Display)]
#[display("dataset {path}")]
pub struct Dataset {
    file: Weak<FileInner>,
    path: NodePath,
    shape: DatasetShape,
    data_type: DataType,
    endianness: Endianness,
}

/// A dataset creation error.
#[derive(Debug, Error)]
pub enum DatasetCreateError {
    /// A node with this name already exists in the parent group.
    #[error("a node already exists at {0}")]
    DuplicateName(NodePath),
    /// The dataset shape is empty or has a zero extent.
    #[error("invalid dataset shape {0:?}")]
    InvalidShape(DatasetShape),
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

/// A dataset open error.
#[derive(Debug, Error)]
pub enum DatasetOpenError {
    /// No dataset with this name exists in the parent group.
    #[error("no dataset found at {0}")]
    NotFound(NodePath),
    /// The node at this path is not a dataset.
    #[error("the node at {0} is not a dataset")]
    NotADataset(NodePath),
    /// The persisted dataset metadata is structurally invalid.
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

/// A dataset read or write error.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The owning container has been closed.
    #[error(transparent)]
    InvalidHandle(#[from] InvalidHandleError),
    /// A supplied buffer does not match the dataset size.
    #[error("got buffer of {got} bytes, expected {expected}")]
    SizeMismatch {
        /// The supplied buffer length in bytes.
        got: u64,
        /// The expected buffer length in bytes.
        expected: u64,
    },
    /// A requested element width differs from the persisted element width.
    #[error("requested element width {requested} is incompatible with stored width {stored}")]
    IncompatibleWidth {
        /// The requested element width in bytes.
        requested: usize,
        /// The persisted element width in bytes.
        stored: usize,
    },
    /// The persisted data is missing or inconsistent with the dataset shape.
    #[error("the data for dataset {0} is missing or inconsistent with its shape")]
    CorruptData(NodePath),
    /// Storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
}

impl Dataset {
    pub(crate) fn create(
        file: &Arc<FileInner>,
        shape: DatasetShape,
        descriptor: TypeDescriptor,
        path: NodePath,
    ) -> Result<Self, DatasetCreateError> {
        file.writable()?;
        if shape.is_empty() || shape.iter().any(|&extent| extent == 0) {
            return Err(DatasetCreateError::InvalidShape(shape));
        }
        if file.storage().get(&meta_key(&path))?.is_some() {
            return Err(DatasetCreateError::DuplicateName(path));
        }
        let metadata = DatasetMetadata::new(shape, descriptor.resolved());
        file.storage()
            .set(&meta_key(&path), &NodeMetadata::Dataset(metadata.clone()).to_json_vec()?)?;
        let dataset = Self::new_with_metadata(Arc::downgrade(file), path, metadata);
        // contents are zero initialised so the persisted container is complete
        let size = dataset.num_elements() as usize * dataset.data_type.size();
        file.storage().set(&data_key(&dataset.path), &vec![0u8; size])?;
        Ok(dataset)
    }

    pub(crate) fn open(file: &Arc<FileInner>, path: NodePath) -> Result<Self, DatasetOpenError> {
        let Some(bytes) = file.storage().get(&meta_key(&path))? else {
            return Err(DatasetOpenError::NotFound(path));
        };
        let metadata: NodeMetadata = serde_json::from_slice(&bytes)
            .map_err(|err| DatasetOpenError::Corrupt(path.clone(), err.to_string()))?;
        metadata
            .validate_format()
            .map_err(|err| DatasetOpenError::Corrupt(path.clone(), err.to_string()))?;
        match metadata {
            NodeMetadata::Dataset(metadata) => {
                Ok(Self::new_with_metadata(Arc::downgrade(file), path, metadata))
            }
            NodeMetadata::Group(_) => Err(DatasetOpenError::NotADataset(path)),
        }
    }

    fn new_with_metadata(file: Weak<FileInner>, path: NodePath, metadata: DatasetMetadata) -> Self {
        Self {
            file,
            path,
            shape: metadata.shape,
            data_type: metadata.data_type,
            endianness: metadata.byte_order,
        }
    }

    fn inner(&self) -> Result<Arc<FileInner>, InvalidHandleError> {
        self.file.upgrade().ok_or(InvalidHandleError)
    }

    /// The path of the dataset in the container.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// The shape of the dataset.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// The number of elements of the dataset.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    /// The persisted element type of the dataset.
    ///
    /// The returned descriptor carries the concrete byte order recorded when
    /// the dataset was created; it is never native-tagged, even if the
    /// dataset was created with [`ByteOrder::Native`].
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidHandle`] if the owning container has
    /// been closed.
    pub fn describe_type(&self) -> Result<TypeDescriptor, DatasetError> {
        self.inner()?;
        Ok(TypeDescriptor::new(self.data_type, self.endianness.into()))
    }

    /// Overwrite the dataset contents from `bytes`, a buffer of elements laid
    /// out as described by `source_type`.
    ///
    /// The elements are converted from `source_type`'s byte order to the
    /// persisted byte order. If the source and persisted kinds differ, each
    /// element's byte pattern is reinterpreted verbatim at the persisted
    /// kind; there is no numeric conversion.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::SizeMismatch`] if `bytes` does not hold
    /// exactly one `source_type` element per dataset element, or if the
    /// source element width differs from the persisted width. On failure the
    /// persisted contents are unchanged.
    pub fn write(&self, source_type: TypeDescriptor, bytes: &[u8]) -> Result<(), DatasetError> {
        let file = self.inner()?;
        file.writable()?;
        let num_elements = self.num_elements();
        let expected_source = num_elements * source_type.size() as u64;
        if bytes.len() as u64 != expected_source {
            return Err(DatasetError::SizeMismatch {
                got: bytes.len() as u64,
                expected: expected_source,
            });
        }
        let expected_stored = num_elements * self.data_type.size() as u64;
        if bytes.len() as u64 != expected_stored {
            return Err(DatasetError::SizeMismatch {
                got: bytes.len() as u64,
                expected: expected_stored,
            });
        }
        let mut converted = bytes.to_vec();
        if source_type.endianness() != self.endianness {
            reverse_endianness(&mut converted, &self.data_type);
        }
        file.storage().set(&data_key(&self.path), &converted)?;
        Ok(())
    }

    /// Overwrite the dataset contents from a typed slice of elements in
    /// native byte order.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::SizeMismatch`] if `elements` does not hold one
    /// element per dataset element or the element width differs from the
    /// persisted width.
    pub fn write_elements<T: Element>(&self, elements: &[T]) -> Result<(), DatasetError> {
        self.write(
            TypeDescriptor::native(T::DATA_TYPE),
            bytemuck::cast_slice(elements),
        )
    }

    /// Read the dataset contents as a buffer of elements laid out as
    /// described by `requested_type`.
    ///
    /// The inverse of [`write`](Dataset::write): elements are converted from
    /// the persisted byte order to `requested_type`'s byte order, with the
    /// same verbatim bit-pattern reinterpretation across same-width kinds.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::IncompatibleWidth`] if the requested element
    /// width differs from the persisted width, since reinterpretation is only
    /// defined at matching widths.
    pub fn read(&self, requested_type: TypeDescriptor) -> Result<Vec<u8>, DatasetError> {
        let file = self.inner()?;
        if requested_type.size() != self.data_type.size() {
            return Err(DatasetError::IncompatibleWidth {
                requested: requested_type.size(),
                stored: self.data_type.size(),
            });
        }
        let Some(mut bytes) = file.storage().get(&data_key(&self.path))? else {
            return Err(DatasetError::CorruptData(self.path.clone()));
        };
        if bytes.len() as u64 != self.num_elements() * self.data_type.size() as u64 {
            return Err(DatasetError::CorruptData(self.path.clone()));
        }
        if requested_type.endianness() != self.endianness {
            reverse_endianness(&mut bytes, &self.data_type);
        }
        Ok(bytes)
    }

    /// Read the dataset contents as a typed vector of elements in native
    /// byte order.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::IncompatibleWidth`] if the element width of
    /// `T` differs from the persisted width.
    pub fn read_elements<T: Element>(&self) -> Result<Vec<T>, DatasetError> {
        let bytes = self.read(TypeDescriptor::native(T::DATA_TYPE))?;
        let mut elements = vec![T::zeroed(); bytes.len() / core::mem::size_of::<T>()];
        bytemuck::cast_slice_mut::<T, u8>(&mut elements).copy_from_slice(&bytes);
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use crate::file::{File, OpenMode};
    use crate::storage::store::MemoryStore;

    use super::*;

    fn create_file() -> File {
        File::open(Arc::new(MemoryStore::new()), OpenMode::Create).unwrap()
    }

    #[test]
    fn dataset_create_resolves_native() {
        let file = create_file();
        let dataset = file
            .root()
            .create_dataset("a", vec![3], TypeDescriptor::native(DataType::Float32))
            .unwrap();
        let descriptor = dataset.describe_type().unwrap();
        assert!(!matches!(descriptor.order(), ByteOrder::Native));
        assert_eq!(descriptor.endianness(), NATIVE_ENDIAN);
        assert_eq!(descriptor, TypeDescriptor::native(DataType::Float32));
    }

    #[test]
    fn dataset_new_contents_are_zero() {
        let file = create_file();
        let dataset = file
            .root()
            .create_dataset("a", vec![2, 3], TypeDescriptor::native(DataType::Int32))
            .unwrap();
        assert_eq!(dataset.num_elements(), 6);
        assert_eq!(dataset.read_elements::<i32>().unwrap(), vec![0; 6]);
    }

    #[test]
    fn dataset_duplicate_name() {
        let file = create_file();
        let root = file.root();
        root.create_dataset("a", vec![3], TypeDescriptor::native(DataType::Int32))
            .unwrap();
        assert!(matches!(
            root.create_dataset("a", vec![3], TypeDescriptor::native(DataType::Int32)),
            Err(DatasetCreateError::DuplicateName(_))
        ));
        // the first dataset remains usable
        let dataset = root.open_dataset("a").unwrap();
        dataset.write_elements::<i32>(&[1, 2, 3]).unwrap();
        assert_eq!(dataset.read_elements::<i32>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn dataset_invalid_shape() {
        let file = create_file();
        let root = file.root();
        assert!(matches!(
            root.create_dataset("a", vec![], TypeDescriptor::native(DataType::Int32)),
            Err(DatasetCreateError::InvalidShape(_))
        ));
        assert!(matches!(
            root.create_dataset("a", vec![3, 0], TypeDescriptor::native(DataType::Int32)),
            Err(DatasetCreateError::InvalidShape(_))
        ));
    }

    #[test]
    fn dataset_round_trip_all_order_pairs() {
        let file = create_file();
        let root = file.root();
        let elements: Vec<i32> = vec![i32::MIN, -1, 0, 1, 0x0102_0304, i32::MAX];
        let orders = [ByteOrder::Native, ByteOrder::Little, ByteOrder::Big];
        for (i, order_disk) in orders.iter().enumerate() {
            for (j, order_memory) in orders.iter().enumerate() {
                let name = format!("d{i}{j}");
                let dataset = root
                    .create_dataset(
                        &name,
                        vec![elements.len() as u64],
                        TypeDescriptor::new(DataType::Int32, *order_disk),
                    )
                    .unwrap();
                dataset
                    .write(
                        TypeDescriptor::new(DataType::Int32, *order_memory),
                        bytemuck::cast_slice(&swap_if_needed(&elements, *order_memory)),
                    )
                    .unwrap();
                let bytes = dataset
                    .read(TypeDescriptor::new(DataType::Int32, *order_memory))
                    .unwrap();
                let read: Vec<i32> = bytes
                    .chunks_exact(4)
                    .map(|chunk| {
                        let value = i32::from_ne_bytes(chunk.try_into().unwrap());
                        match order_memory.resolve() {
                            e if e.is_native() => value,
                            _ => value.swap_bytes(),
                        }
                    })
                    .collect();
                assert_eq!(read, elements, "order pair ({order_disk}, {order_memory})");
            }
        }
    }

    fn swap_if_needed(elements: &[i32], order: ByteOrder) -> Vec<i32> {
        if order.resolve().is_native() {
            elements.to_vec()
        } else {
            elements.iter().map(|value| value.swap_bytes()).collect()
        }
    }

    #[test]
    fn dataset_punning_preserves_bit_patterns() {
        let file = create_file();
        let root = file.root();
        for (name, order) in [
            ("native", ByteOrder::Native),
            ("little", ByteOrder::Little),
            ("big", ByteOrder::Big),
        ] {
            let dataset = root
                .create_dataset(name, vec![3], TypeDescriptor::new(DataType::Float32, order))
                .unwrap();
            dataset.write_elements::<i32>(&[0, 1, 0]).unwrap();
            assert_eq!(dataset.read_elements::<i32>().unwrap(), vec![0, 1, 0]);
        }
    }

    #[test]
    fn dataset_write_size_mismatch() {
        let file = create_file();
        let dataset = file
            .root()
            .create_dataset("a", vec![3], TypeDescriptor::native(DataType::Int32))
            .unwrap();
        dataset.write_elements::<i32>(&[7, 8, 9]).unwrap();
        // buffer sized for two elements, not three
        let err = dataset
            .write(TypeDescriptor::native(DataType::Int32), &[0u8; 8])
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::SizeMismatch {
                got: 8,
                expected: 12
            }
        ));
        // a wider source view is also a size mismatch
        let err = dataset
            .write(TypeDescriptor::native(DataType::Float64), &[0u8; 24])
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::SizeMismatch {
                got: 24,
                expected: 12
            }
        ));
        // failed writes leave the contents unchanged
        assert_eq!(dataset.read_elements::<i32>().unwrap(), vec![7, 8, 9]);
    }

    #[test]
    fn dataset_read_incompatible_width() {
        let file = create_file();
        let dataset = file
            .root()
            .create_dataset("a", vec![3], TypeDescriptor::native(DataType::Float32))
            .unwrap();
        let err = dataset
            .read(TypeDescriptor::native(DataType::Float64))
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::IncompatibleWidth {
                requested: 8,
                stored: 4
            }
        ));
        assert!(dataset.read_elements::<i64>().is_err());
        // a same-width kind is fine
        assert!(dataset.read_elements::<u32>().is_ok());
    }

    #[test]
    fn dataset_handle_invalid_after_close() {
        let file = create_file();
        let dataset = file
            .root()
            .create_dataset("a", vec![3], TypeDescriptor::native(DataType::Int32))
            .unwrap();
        file.close();
        assert!(matches!(
            dataset.write_elements::<i32>(&[0, 1, 2]),
            Err(DatasetError::InvalidHandle(_))
        ));
        assert!(matches!(
            dataset.read_elements::<i32>(),
            Err(DatasetError::InvalidHandle(_))
        ));
        assert!(matches!(
            dataset.describe_type(),
            Err(DatasetError::InvalidHandle(_))
        ));
    }
}
