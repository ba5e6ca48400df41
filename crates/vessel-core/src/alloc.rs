//! The allocator capability used by Vessel containers.
//!
//! An [`Allocator`] owns two concerns that a container composes but never
//! performs itself:
//!
//! - **Storage:** acquiring and releasing raw, uninitialised blocks sized
//!   for `n` elements.
//! - **Lifetime:** constructing an element in a slot, and running its
//!   destructor without releasing the slot.
//!
//! The growth policy stays with the container. [`Heap`] is the default
//! implementation over the global allocator.

#![allow(unsafe_code)]

use std::alloc::{alloc, dealloc, Layout};
use std::ptr::{self, NonNull};

use log::warn;

use crate::error::AllocError;

/// Raw storage and element-lifetime capability for a container of `T`.
///
/// All methods take `&self`; stateful allocators use interior mutability.
///
/// # Safety
///
/// Implementors must guarantee that a pointer returned by
/// [`allocate(n)`](Allocator::allocate) is non-null, aligned for `T`, and
/// valid for reads and writes of `n` elements until it is passed to
/// [`deallocate`](Allocator::deallocate). Zero-byte requests may return a
/// dangling aligned pointer. `construct` and `destroy` must not unwind
/// except through `T`'s own destructor.
pub unsafe trait Allocator<T> {
    /// Acquire uninitialised storage for `n` elements.
    ///
    /// Returns [`AllocError::OutOfMemory`] if the request cannot be
    /// satisfied, including when the byte size overflows `isize`.
    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError>;

    /// Release a block previously returned by `allocate(n)`.
    ///
    /// # Safety
    ///
    /// `block` must come from `allocate(n)` on this allocator (or a clone
    /// of it) with the same `n`, and must not have been released already.
    /// No element may still be constructed in it.
    unsafe fn deallocate(&self, block: NonNull<T>, n: usize);

    /// Initialise `slot` by moving `value` into it.
    ///
    /// # Safety
    ///
    /// `slot` must lie inside a live block from this allocator and must not
    /// hold a constructed element.
    unsafe fn construct(&self, slot: NonNull<T>, value: T) {
        // SAFETY: the caller guarantees `slot` is valid for writes and empty.
        unsafe { slot.as_ptr().write(value) }
    }

    /// Run the destructor of the element in `slot`, keeping the memory.
    ///
    /// # Safety
    ///
    /// `slot` must hold a constructed element. The slot is uninitialised
    /// afterwards and must not be read until constructed again.
    unsafe fn destroy(&self, slot: NonNull<T>) {
        // SAFETY: the caller guarantees `slot` holds a live element.
        unsafe { ptr::drop_in_place(slot.as_ptr()) }
    }
}

/// Layout of a block of `n` elements of `T`.
///
/// Fails with [`AllocError::OutOfMemory`] when the size overflows.
pub fn array_layout<T>(n: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(n).map_err(|_| AllocError::OutOfMemory { requested: n })
}

/// The process-global allocator.
///
/// Stateless and zero-sized; every container that does not name an
/// allocator uses this one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Heap;

// SAFETY: blocks come from `std::alloc::alloc` with `Layout::array::<T>(n)`,
// which is non-null on success and aligned for `T`. Zero-byte requests get
// `NonNull::dangling()`, which is aligned and never passed to `dealloc`.
unsafe impl<T> Allocator<T> for Heap {
    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let layout = array_layout::<T>(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or_else(|| {
            warn!(
                "heap allocation of {n} elements ({} bytes) failed",
                layout.size()
            );
            AllocError::OutOfMemory { requested: n }
        })
    }

    unsafe fn deallocate(&self, block: NonNull<T>, n: usize) {
        if let Ok(layout) = Layout::array::<T>(n) {
            if layout.size() != 0 {
                // SAFETY: the caller guarantees `block` came from
                // `allocate(n)`, which used this exact layout.
                unsafe { dealloc(block.as_ptr().cast::<u8>(), layout) }
            }
        }
    }
}
