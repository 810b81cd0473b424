//! A minimal hierarchical storage engine for multidimensional arrays with
//! explicit byte-order control.
//!
//! An `ndstore` container is a tree of named groups holding named datasets:
//! fixed-shape dense arrays of numeric elements. Each dataset declares its
//! element type with a [`TypeDescriptor`](dataset::TypeDescriptor) — a logical
//! [`DataType`](dataset::DataType) plus a [`ByteOrder`](dataset::ByteOrder) —
//! and may be stored in the machine's native byte order or forced to little or
//! big endian regardless of platform. A native-tagged type is resolved to the
//! concrete machine order when the dataset is created, so a stored dataset
//! always reports a concrete order. Reads and writes convert between the
//! stored order and the caller's requested in-memory order, preserving element
//! bit patterns exactly — including across same-width logical kinds.
//!
//! ## Example
//! ```rust
//! # use std::sync::Arc;
//! use ndstore::dataset::{ByteOrder, DataType, TypeDescriptor};
//! use ndstore::file::{File, OpenMode};
//! use ndstore::storage::store::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//!
//! let file = File::open(store.clone(), OpenMode::Create)?;
//! let group = file.root().create_group("met_data")?;
//! let dataset = group.create_dataset(
//!     "pressure",
//!     vec![3],
//!     TypeDescriptor::new(DataType::Float32, ByteOrder::Big),
//! )?;
//! dataset.write_elements::<f32>(&[1013.25, 1012.0, 1011.5])?;
//! file.close();
//!
//! let file = File::open(store, OpenMode::ReadExisting)?;
//! let dataset = file.root().open_group("met_data")?.open_dataset("pressure")?;
//! assert_eq!(dataset.read_elements::<f32>()?, vec![1013.25, 1012.0, 1011.5]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Containers persist through a [store](crate::storage):
//! [`MemoryStore`](storage::store::MemoryStore) for transient data and
//! [`FilesystemStore`](storage::store::FilesystemStore) for data that outlives
//! the process.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]

pub mod dataset;
pub mod file;
pub mod group;
pub mod metadata;
pub mod node;
pub mod storage;
