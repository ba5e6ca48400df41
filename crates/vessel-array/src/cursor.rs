//! Checked positions into a [`DynArray`].
//!
//! A [`Cursor`] does not borrow its array. It carries the array's
//! [`ArrayId`], a position, and the epoch it last validated against, and
//! is resolved against the array on each use. That lets a cursor outlive
//! a mutation and report that it went stale instead of reading whatever
//! now occupies its slot.

use vessel_core::{Allocator, ArrayId, Epoch};

use crate::array::DynArray;
use crate::error::CursorError;

/// A position in one specific [`DynArray`].
///
/// States:
///
/// - **Unbound:** created by [`Cursor::unbound`] or `Default`. Belongs to
///   no array; every use fails.
/// - **Live:** created by the array and not yet disturbed.
/// - **Invalidated:** a structural mutation touched its position after it
///   was taken. Permanent.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cursor {
    array: Option<ArrayId>,
    position: usize,
    epoch: Epoch,
}

impl Cursor {
    /// Create a cursor bound to `array` at `position`.
    pub(crate) fn new(array: ArrayId, position: usize, epoch: Epoch) -> Self {
        Self {
            array: Some(array),
            position,
            epoch,
        }
    }

    /// A cursor that belongs to no array.
    pub fn unbound() -> Self {
        Self::default()
    }

    /// The recorded position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The array this cursor belongs to, if any.
    pub fn array_id(&self) -> Option<ArrayId> {
        self.array
    }

    /// Whether the cursor belongs to an array.
    pub fn is_bound(&self) -> bool {
        self.array.is_some()
    }

    /// Whether the cursor is Live for `array`.
    pub fn is_live<T, A: Allocator<T>>(&self, array: &DynArray<T, A>) -> bool {
        self.validate(array).is_ok()
    }

    /// The element at the cursor's position.
    ///
    /// # Errors
    ///
    /// - [`CursorError::InvalidIterator`] if unbound or invalidated.
    /// - [`CursorError::IncompatibleIterator`] if `array` is not the cursor's
    ///   array.
    /// - [`CursorError::PastEnd`] at the end position.
    pub fn get<'a, T, A: Allocator<T>>(
        &self,
        array: &'a DynArray<T, A>,
    ) -> Result<&'a T, CursorError> {
        let position = self.validate(array)?;
        array
            .get(position)
            .ok_or(CursorError::PastEnd { position })
    }

    /// Mutable access to the element at the cursor's position.
    ///
    /// Writing through the returned reference is not a structural
    /// mutation and invalidates nothing. Errors as for [`get`](Self::get).
    pub fn get_mut<'a, T, A: Allocator<T>>(
        &self,
        array: &'a mut DynArray<T, A>,
    ) -> Result<&'a mut T, CursorError> {
        let position = self.validate(array)?;
        array
            .get_mut(position)
            .ok_or(CursorError::PastEnd { position })
    }

    /// Step to the next position.
    ///
    /// Stepping onto `len` yields a Live end cursor. On success the cursor
    /// revalidates at the array's current epoch.
    ///
    /// # Errors
    ///
    /// As for [`get`](Self::get); [`CursorError::PastEnd`] when already at
    /// the end. The cursor is unchanged on error.
    pub fn advance<T, A: Allocator<T>>(
        &mut self,
        array: &DynArray<T, A>,
    ) -> Result<(), CursorError> {
        let position = self.validate(array)?;
        if position >= array.len() {
            return Err(CursorError::PastEnd { position });
        }
        self.position = position + 1;
        self.epoch = array.tracker().register();
        Ok(())
    }

    /// Compare positions with `other`.
    ///
    /// # Errors
    ///
    /// [`CursorError::IncompatibleIterator`] unless both cursors belong to
    /// the same array. An unbound cursor is compatible with nothing.
    pub fn equals(&self, other: &Cursor) -> Result<bool, CursorError> {
        match (self.array, other.array) {
            (Some(a), Some(b)) if a == b => Ok(self.position == other.position),
            _ => Err(CursorError::IncompatibleIterator),
        }
    }

    fn validate<T, A: Allocator<T>>(&self, array: &DynArray<T, A>) -> Result<usize, CursorError> {
        let id = self.array.ok_or(CursorError::InvalidIterator)?;
        if id != array.id() {
            return Err(CursorError::IncompatibleIterator);
        }
        if !array
            .tracker()
            .is_live(self.epoch, self.position, array.len())
        {
            return Err(CursorError::InvalidIterator);
        }
        Ok(self.position)
    }
}
