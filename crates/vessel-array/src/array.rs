//! The growable array.
//!
//! [`DynArray`] composes a `RawBuffer` (storage + allocator), a count of
//! constructed elements, and an [`InvalidationTracker`]. Every operation
//! that moves or destroys elements goes through here and stamps the
//! tracker so that outstanding [`Cursor`]s notice.

#![allow(unsafe_code)]

use std::fmt;
use std::ops::{Index, IndexMut};
use std::slice;

use log::debug;
use vessel_core::{Allocator, ArrayId, Epoch, Heap};

use crate::config::ArrayConfig;
use crate::cursor::Cursor;
use crate::error::ArrayError;
use crate::raw::RawBuffer;
use crate::tracker::InvalidationTracker;

/// A contiguous, growable array of `T` backed by allocator `A`.
///
/// Elements occupy the prefix `[0, len)` of a block of `capacity` slots.
/// When a push or insert finds the block full, the array moves into a
/// block twice the size (at least 1) and releases the old one.
///
/// # Structural mutations
///
/// | Operation | Cursors invalidated |
/// |-----------|---------------------|
/// | growth (inside `push_back`/`insert`) | all |
/// | `insert(p, _)` | positions `>= p` |
/// | `erase(p)` | positions `>= p` |
/// | `pop_back()` | the removed slot and the old end |
/// | `clear()`, `clone_from` | all |
///
/// Writing to an element in place (`at_mut`, `get_mut`, `IndexMut`,
/// [`Cursor::get_mut`]) is not structural.
pub struct DynArray<T, A: Allocator<T> = Heap> {
    buf: RawBuffer<T, A>,
    len: usize,
    tracker: InvalidationTracker,
    id: ArrayId,
}

impl<T> DynArray<T, Heap> {
    /// Create an empty array with
    /// [`ArrayConfig::DEFAULT_INITIAL_CAPACITY`] slots on the heap.
    pub fn new() -> Result<Self, ArrayError> {
        Self::with_config(&ArrayConfig::default())
    }

    /// Create an empty array with `capacity` slots on the heap.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        Self::with_capacity_in(capacity, Heap)
    }

    /// Create an empty heap array from a config.
    pub fn with_config(config: &ArrayConfig) -> Result<Self, ArrayError> {
        Self::with_capacity_in(config.initial_capacity, Heap)
    }
}

impl<T, A: Allocator<T>> DynArray<T, A> {
    /// Create an empty array with the default capacity in `alloc`.
    pub fn new_in(alloc: A) -> Result<Self, ArrayError> {
        Self::with_capacity_in(ArrayConfig::DEFAULT_INITIAL_CAPACITY, alloc)
    }

    /// Create an empty array with `capacity` slots in `alloc`.
    ///
    /// Returns [`ArrayError::OutOfMemory`] if the allocator refuses.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, ArrayError> {
        let buf = RawBuffer::allocate_in(capacity, alloc)?;
        Ok(Self {
            buf,
            len: 0,
            tracker: InvalidationTracker::new()?,
            id: ArrayId::next(),
        })
    }

    /// Number of constructed elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of slots in the current block.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the next push or insert has to grow.
    pub fn is_full(&self) -> bool {
        self.len == self.buf.capacity()
    }

    /// This array's identity. Cursors carry it.
    pub fn id(&self) -> ArrayId {
        self.id
    }

    /// The current mutation epoch.
    pub fn epoch(&self) -> Epoch {
        self.tracker.epoch()
    }

    /// The allocator backing this array.
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    pub(crate) fn tracker(&self) -> &InvalidationTracker {
        &self.tracker
    }

    /// Append `value`, growing first if the array is full.
    ///
    /// Growth invalidates every cursor. On error the array is unchanged
    /// and `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<(), ArrayError> {
        self.make_room()?;
        // SAFETY: `len < capacity` after growth and slot `len` is empty.
        unsafe { self.buf.construct(self.len, value) };
        self.len += 1;
        Ok(())
    }

    /// Destroy the last element. Does nothing when empty.
    ///
    /// Invalidates cursors at the removed slot and at the old end.
    pub fn pop_back(&mut self) {
        if self.len == 0 {
            return;
        }
        self.len -= 1;
        self.tracker.invalidate_from(self.len, self.len + 1);
        // SAFETY: slot `len` was the last constructed element and is no
        // longer counted.
        unsafe { self.buf.destroy(self.len) };
    }

    /// Insert `value` at `position`, shifting `[position, len)` up by one.
    ///
    /// Returns a Live cursor at `position`. Invalidates every cursor at
    /// `position` or later, or every cursor if the array had to grow.
    ///
    /// # Errors
    ///
    /// - [`ArrayError::PositionOutOfRange`] if `position > len`.
    /// - [`ArrayError::OutOfMemory`] / [`ArrayError::CapacityOverflow`] if
    ///   growth fails. The array is unchanged.
    pub fn insert(&mut self, position: usize, value: T) -> Result<Cursor, ArrayError> {
        if position > self.len {
            return Err(ArrayError::PositionOutOfRange {
                position,
                len: self.len,
            });
        }
        self.make_room()?;
        // SAFETY: `position <= len < capacity`; after the shift slot
        // `position` is empty.
        unsafe {
            self.buf.shift_up(position, self.len);
            self.buf.construct(position, value);
        }
        self.tracker.invalidate_from(position, self.len);
        self.len += 1;
        Ok(self.cursor(position))
    }

    /// Destroy the element at `position`, shifting `[position + 1, len)`
    /// down by one.
    ///
    /// Returns a Live cursor at `position`: the element that moved into
    /// it, or the end if the last element was erased. Invalidates every
    /// cursor at `position` or later.
    ///
    /// # Errors
    ///
    /// [`ArrayError::PositionOutOfRange`] if `position >= len`.
    pub fn erase(&mut self, position: usize) -> Result<Cursor, ArrayError> {
        let len = self.len;
        if position >= len {
            return Err(ArrayError::PositionOutOfRange { position, len });
        }
        self.tracker.invalidate_from(position, len);
        // The tail leaks instead of being dropped twice if the destructor
        // unwinds.
        self.len = position;
        // SAFETY: slot `position` is constructed; once destroyed it is the
        // only empty slot in `[0, len)`.
        unsafe {
            self.buf.destroy(position);
            self.buf.shift_down(position, len);
        }
        self.len = len - 1;
        Ok(self.cursor(position))
    }

    /// Destroy every element, keeping the capacity.
    ///
    /// Invalidates every cursor.
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        self.tracker.invalidate_all();
        for i in 0..len {
            // SAFETY: slots `[0, len)` were constructed and each is
            // destroyed once.
            unsafe { self.buf.destroy(i) };
        }
    }

    /// The element at `index`.
    ///
    /// Unchecked in the sense of direct array indexing: the caller keeps
    /// `index < len()`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn at(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }

    /// Mutable access to the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }

    /// The element at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Mutable access to the element at `index`, or `None` if out of range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// The first element.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Mutable access to the first element.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// The last element.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Mutable access to the last element.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// The constructed elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the block is non-null and aligned, and `[0, len)` is
        // constructed.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// The constructed elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`, and `&mut self` is exclusive.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// Borrowing iterator over the elements.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Mutable borrowing iterator over the elements.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// A Live cursor at position 0.
    pub fn begin(&self) -> Cursor {
        self.cursor(0)
    }

    /// A Live cursor at position `len`.
    pub fn end(&self) -> Cursor {
        self.cursor(self.len)
    }

    /// A Live cursor at `position`.
    ///
    /// Returns [`ArrayError::PositionOutOfRange`] if `position > len`.
    pub fn cursor_at(&self, position: usize) -> Result<Cursor, ArrayError> {
        if position > self.len {
            return Err(ArrayError::PositionOutOfRange {
                position,
                len: self.len,
            });
        }
        Ok(self.cursor(position))
    }

    /// Deep-copy into a new array with the same capacity and a fresh id.
    ///
    /// The copy shares no storage and no cursors with `self`.
    pub fn try_clone(&self) -> Result<Self, ArrayError>
    where
        T: Clone,
        A: Clone,
    {
        let mut copy = Self::with_capacity_in(self.capacity(), self.allocator().clone())?;
        for value in self.iter() {
            copy.push_back(value.clone())?;
        }
        Ok(copy)
    }

    /// Replace the contents with a deep copy of `source`.
    ///
    /// `self` keeps its id; every cursor of `self` is invalidated. On error
    /// `self` is unchanged.
    pub fn try_assign_from(&mut self, source: &Self) -> Result<(), ArrayError>
    where
        T: Clone,
        A: Clone,
    {
        let mut fresh = source.try_clone()?;
        self.tracker.cover(fresh.len)?;
        std::mem::swap(&mut self.buf, &mut fresh.buf);
        std::mem::swap(&mut self.len, &mut fresh.len);
        self.tracker.invalidate_all();
        Ok(())
    }

    fn cursor(&self, position: usize) -> Cursor {
        Cursor::new(self.id, position, self.tracker.register())
    }

    /// Prepare for one more element: extend the stamp table to the new end
    /// position, then grow if full. Nothing observable changes on error.
    fn make_room(&mut self) -> Result<(), ArrayError> {
        let capacity = self.capacity();
        let next = self
            .len
            .checked_add(1)
            .ok_or(ArrayError::CapacityOverflow { capacity })?;
        self.tracker.cover(next)?;
        if self.is_full() {
            self.grow()?;
        }
        Ok(())
    }

    fn grow(&mut self) -> Result<(), ArrayError> {
        let old = self.buf.capacity();
        let new = old
            .checked_mul(2)
            .ok_or(ArrayError::CapacityOverflow { capacity: old })?
            .max(1);
        // SAFETY: `[0, len)` is constructed and `len <= old < new`.
        unsafe { self.buf.relocate(self.len, new)? };
        self.tracker.invalidate_all();
        debug!("array {} grew from {old} to {new} slots", self.id);
        Ok(())
    }
}

impl<T, A: Allocator<T>> Drop for DynArray<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone, A: Allocator<T> + Clone> Clone for DynArray<T, A> {
    /// # Panics
    ///
    /// Panics if the allocator cannot provide the copy's storage. Use
    /// [`DynArray::try_clone`] to handle that case.
    fn clone(&self) -> Self {
        self.try_clone()
            .unwrap_or_else(|err| panic!("failed to clone array {}: {err}", self.id))
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.try_assign_from(source) {
            panic!("failed to assign array {}: {err}", self.id);
        }
    }
}

impl<T: fmt::Debug, A: Allocator<T>> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A, B> PartialEq<DynArray<T, B>> for DynArray<T, A>
where
    T: PartialEq,
    A: Allocator<T>,
    B: Allocator<T>,
{
    fn eq(&self, other: &DynArray<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator<T>> Eq for DynArray<T, A> {}

impl<T: PartialEq, A: Allocator<T>, const N: usize> PartialEq<[T; N]> for DynArray<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, A: Allocator<T>> Index<usize> for DynArray<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.at(index)
    }
}

impl<T, A: Allocator<T>> IndexMut<usize> for DynArray<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.at_mut(index)
    }
}

impl<'a, T, A: Allocator<T>> IntoIterator for &'a DynArray<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator<T>> IntoIterator for &'a mut DynArray<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A: Allocator<T>> Extend<T> for DynArray<T, A> {
    /// # Panics
    ///
    /// Panics if growth fails.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(err) = self.push_back(value) {
                panic!("failed to extend array {}: {err}", self.id);
            }
        }
    }
}

impl<T> FromIterator<T> for DynArray<T, Heap> {
    /// # Panics
    ///
    /// Panics if the heap cannot provide storage.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut array = Self::with_capacity(iter.size_hint().0)
            .unwrap_or_else(|err| panic!("failed to collect into array: {err}"));
        array.extend(iter);
        array
    }
}
