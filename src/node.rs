//! Hierarchy paths and names.
//!
//! Every group and dataset in a container is addressed by a [`NodePath`] rooted
//! at `/`. Path components are validated [`NodeName`]s.

mod node_name;
mod node_path;

pub use node_name::{NodeName, NodeNameError};
pub use node_path::{NodePath, NodePathError};
