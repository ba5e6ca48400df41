//! Vessel: growable contiguous containers with pluggable allocators.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Vessel sub-crates. For most users, adding `vessel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use vessel::prelude::*;
//!
//! let mut array: DynArray<i32> = DynArray::with_capacity(2).unwrap();
//! array.push_back(1).unwrap();
//! array.push_back(2).unwrap();
//! array.push_back(3).unwrap();
//! assert_eq!(array.capacity(), 4);
//!
//! // Cursors are checked against the array on every use.
//! let cursor = array.cursor_at(2).unwrap();
//! assert_eq!(cursor.get(&array), Ok(&3));
//!
//! array.insert(1, 99).unwrap();
//! assert_eq!(cursor.get(&array), Err(CursorError::InvalidIterator));
//! assert_eq!(array.cursor_at(3).unwrap().get(&array), Ok(&3));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `vessel-core` | `Allocator`, `Heap`, `ArrayId`, `Epoch`, `AllocError` |
//! | [`array`] | `vessel-array` | `DynArray`, `Cursor`, `ArrayConfig`, errors |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core identifiers, errors, and the allocator capability (`vessel-core`).
///
/// Implement [`types::Allocator`] to plug custom storage into a
/// [`array::DynArray`].
pub use vessel_core as types;

/// The growable array and its cursors (`vessel-array`).
pub use vessel_array as array;

/// Common imports for typical Vessel usage.
///
/// ```rust
/// use vessel::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use vessel_core::{AllocError, Allocator, Heap};

    // Array
    pub use vessel_array::{ArrayConfig, ArrayError, Cursor, CursorError, DynArray};
}
