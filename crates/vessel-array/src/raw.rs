//! Low-level storage for [`DynArray`](crate::DynArray).
//!
//! [`RawBuffer`] owns one block from an allocator and knows its capacity,
//! but not how many slots hold constructed elements. The array tracks
//! that and passes it into every operation that moves elements. All
//! pointer arithmetic in the crate lives here, each `unsafe` block with a
//! `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::ptr::NonNull;

use vessel_core::{AllocError, Allocator};

/// An owned, uninitialised block of `capacity` slots for `T`.
///
/// Dropping the buffer releases the block but never runs element
/// destructors; the owner must destroy constructed elements first.
pub(crate) struct RawBuffer<T, A: Allocator<T>> {
    ptr: NonNull<T>,
    capacity: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

// SAFETY: the buffer uniquely owns its block, like `Box<[T]>`.
unsafe impl<T: Send, A: Allocator<T> + Send> Send for RawBuffer<T, A> {}
// SAFETY: shared access only hands out `&T` and `&A`.
unsafe impl<T: Sync, A: Allocator<T> + Sync> Sync for RawBuffer<T, A> {}

impl<T, A: Allocator<T>> RawBuffer<T, A> {
    /// Allocate a block of `capacity` slots from `alloc`.
    pub(crate) fn allocate_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let ptr = alloc.allocate(capacity)?;
        Ok(Self {
            ptr,
            capacity,
            alloc,
            _owns: PhantomData,
        })
    }

    /// Number of slots in the block.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// The allocator that owns the block.
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Pointer to the first slot.
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// `index <= capacity`.
    pub(crate) unsafe fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(index <= self.capacity);
        // SAFETY: in bounds of the block (or one past it) per the contract.
        unsafe { self.ptr.add(index) }
    }

    /// Construct `value` in slot `index`.
    ///
    /// # Safety
    ///
    /// `index < capacity` and the slot is empty.
    pub(crate) unsafe fn construct(&self, index: usize, value: T) {
        debug_assert!(index < self.capacity);
        // SAFETY: forwarded contract.
        unsafe { self.alloc.construct(self.slot(index), value) }
    }

    /// Destroy the element in slot `index`.
    ///
    /// # Safety
    ///
    /// `index < capacity` and the slot holds a constructed element.
    pub(crate) unsafe fn destroy(&self, index: usize) {
        debug_assert!(index < self.capacity);
        // SAFETY: forwarded contract.
        unsafe { self.alloc.destroy(self.slot(index)) }
    }

    /// Move the first `len` elements into a new block of `new_capacity`
    /// slots and release the old block.
    ///
    /// The new block is acquired before anything moves, so on
    /// `Err` the buffer is untouched.
    ///
    /// # Safety
    ///
    /// Slots `[0, len)` hold constructed elements and `len <= new_capacity`.
    pub(crate) unsafe fn relocate(
        &mut self,
        len: usize,
        new_capacity: usize,
    ) -> Result<(), AllocError> {
        debug_assert!(len <= self.capacity && len <= new_capacity);
        let fresh = self.alloc.allocate(new_capacity)?;
        for i in 0..len {
            // SAFETY: slot `i` of the old block is constructed and is read
            // exactly once; slot `i` of the new block is in bounds and empty.
            unsafe {
                let value = self.slot(i).as_ptr().read();
                self.alloc.construct(fresh.add(i), value);
            }
        }
        // SAFETY: every element has been moved out of the old block.
        unsafe { self.alloc.deallocate(self.ptr, self.capacity) };
        self.ptr = fresh;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Move `[position, len)` one slot toward the end, highest index first.
    ///
    /// Slot `position` is left empty.
    ///
    /// # Safety
    ///
    /// `position <= len < capacity` and `[0, len)` is constructed.
    pub(crate) unsafe fn shift_up(&self, position: usize, len: usize) {
        debug_assert!(position <= len && len < self.capacity);
        for i in (position..len).rev() {
            // SAFETY: slot `i` is constructed and slot `i + 1` is empty,
            // either because it was past `len` or was just moved out of.
            unsafe {
                let value = self.slot(i).as_ptr().read();
                self.construct(i + 1, value);
            }
        }
    }

    /// Move `[position + 1, len)` one slot toward the start, lowest index
    /// first.
    ///
    /// Slot `len - 1` is left empty.
    ///
    /// # Safety
    ///
    /// `position < len <= capacity`, slot `position` is empty, and the rest
    /// of `[0, len)` is constructed.
    pub(crate) unsafe fn shift_down(&self, position: usize, len: usize) {
        debug_assert!(position < len && len <= self.capacity);
        for i in position + 1..len {
            // SAFETY: slot `i` is constructed and slot `i - 1` is empty.
            unsafe {
                let value = self.slot(i).as_ptr().read();
                self.construct(i - 1, value);
            }
        }
    }
}

impl<T, A: Allocator<T>> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        // SAFETY: the block came from `allocate(capacity)` on this
        // allocator and the owner has destroyed every element.
        unsafe { self.alloc.deallocate(self.ptr, self.capacity) }
    }
}
