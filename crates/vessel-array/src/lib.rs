//! Growable contiguous array with a pluggable allocator.
//!
//! [`DynArray`] keeps its elements in one block obtained from an
//! [`Allocator`](vessel_core::Allocator), doubling the block when it runs
//! out of room. Positions into the array are handed out as [`Cursor`]
//! values that are checked against the array on every use.
//!
//! # Architecture
//!
//! ```text
//! DynArray<T, A>
//! ├── RawBuffer<T, A>  (block pointer + capacity + allocator)
//! ├── len              (constructed prefix [0, len))
//! ├── ArrayId          (identity that cursors carry)
//! └── InvalidationTracker
//!     ├── epoch        (bumped on every structural mutation)
//!     ├── floor        (epoch of the last whole-array relocation)
//!     └── stamps[0..=max len]
//! ```
//!
//! # Cursor validity
//!
//! A cursor records the array's epoch when it was created or last
//! advanced. It is Live while no relocation has happened since, its
//! position is within `[0, len]`, and its slot has not been stamped by a
//! later insert, erase, or pop. Every check is O(1); stamping costs the
//! same order as the element shift that caused it.
//!
//! Once a slot is stamped past a cursor's epoch, the cursor stays dead
//! even if the array later regrows over that position.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod config;
pub mod cursor;
pub mod error;
mod raw;
pub mod tracker;

// Public re-exports for the primary API surface.
pub use array::DynArray;
pub use config::ArrayConfig;
pub use cursor::Cursor;
pub use error::{ArrayError, CursorError};
pub use tracker::InvalidationTracker;
