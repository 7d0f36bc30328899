//! Packing: live source to static snapshot
//!
//! - [`Packer`] - the one pack operation, parameterized by an output sink
//!   (any [`FileSystemAdapter`]): write-through to disk or in-memory capture
//! - [`layout`] - snapshot directory layout and path derivation
//! - [`IndexBuilder`] / [`FieldIndexBuilder`] - advisory index construction
//!
//! [`FileSystemAdapter`]: crate::adapters::fs::FileSystemAdapter

pub mod index;
pub mod layout;
pub mod packer;

pub use index::{FieldIndexBuilder, IndexBuilder};
pub use packer::{PackConfig, PackOutcome, PackSummary, Packer};
