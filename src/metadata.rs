//! Persisted node metadata.
//!
//! Every node in a container persists one JSON metadata document at its
//! [`meta_key`](crate::storage::meta_key), tagged by `node_type`. For example,
//! a dataset document:
//!
//! ```json
//! {
//!     "node_type": "dataset",
//!     "ndstore_format": 1,
//!     "shape": [3],
//!     "data_type": "float32",
//!     "byte_order": "little"
//! }
//! ```
//!
//! The `byte_order` field is always a concrete order: a dataset created with a
//! native-tagged type has the tag resolved before its metadata is written.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    dataset::{DataType, DatasetShape, Endianness, TypeDescriptor},
    storage::StorageError,
};

/// The metadata format version written by this crate.
pub const FORMAT_VERSION: usize = 1;

/// An unsupported metadata format version error.
#[derive(Debug, Error)]
#[error("unsupported format version {0}, expected {FORMAT_VERSION}")]
pub struct UnsupportedFormatError(usize);

/// The metadata document of a node: a group or a dataset.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
#[serde(tag = "node_type", rename_all = "lowercase")]
pub enum NodeMetadata {
    /// Group metadata.
    Group(GroupMetadata),
    /// Dataset metadata.
    Dataset(DatasetMetadata),
}

impl NodeMetadata {
    /// Validate the format version.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormatError`] if the format version is not supported.
    pub fn validate_format(&self) -> Result<(), UnsupportedFormatError> {
        let format = match self {
            Self::Group(metadata) => metadata.ndstore_format,
            Self::Dataset(metadata) => metadata.ndstore_format,
        };
        if format == FORMAT_VERSION {
            Ok(())
        } else {
            Err(UnsupportedFormatError(format))
        }
    }

    /// Serialize to the persisted JSON document.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if serialization fails.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, StorageError> {
        serde_json::to_vec_pretty(self).map_err(|err| StorageError::Other(err.to_string()))
    }
}

/// The metadata document of a group.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
pub struct GroupMetadata {
    /// The metadata format version.
    pub ndstore_format: usize,
}

impl GroupMetadata {
    /// Create group metadata at the current format version.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ndstore_format: FORMAT_VERSION,
        }
    }
}

impl Default for GroupMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// The metadata document of a dataset.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
pub struct DatasetMetadata {
    /// The metadata format version.
    pub ndstore_format: usize,
    /// The dataset shape.
    pub shape: DatasetShape,
    /// The logical element data type.
    pub data_type: DataType,
    /// The concrete byte order of the persisted elements, never native-tagged.
    pub byte_order: Endianness,
}

impl DatasetMetadata {
    /// Create dataset metadata from a shape and an element type descriptor.
    ///
    /// A `Native` order tag on `descriptor` is resolved to the concrete order
    /// of the executing machine; the persisted byte order is never ambiguous.
    #[must_use]
    pub fn new(shape: DatasetShape, descriptor: TypeDescriptor) -> Self {
        Self {
            ndstore_format: FORMAT_VERSION,
            shape,
            data_type: descriptor.data_type(),
            byte_order: descriptor.endianness(),
        }
    }

    /// The persisted element type descriptor, with its concrete byte order.
    #[must_use]
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::new(self.data_type, self.byte_order.into())
    }
}
