//! Core types for the Vessel container workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! identifiers shared by containers and their cursors, the allocation
//! error type, and the [`Allocator`] capability that separates raw memory
//! management from element construction and destruction.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod alloc;
pub mod error;
pub mod id;

pub use alloc::{Allocator, Heap};
pub use error::AllocError;
pub use id::{ArrayId, Epoch};
