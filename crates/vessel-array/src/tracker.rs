//! Stale-cursor detection by mutation epoch.
//!
//! An [`InvalidationTracker`] decides whether a cursor taken at some
//! epoch may still read the slot it points at. There is no registry of
//! live cursors: a cursor is just a position and an [`Epoch`], and the
//! tracker keeps enough history to judge it in O(1).
//!
//! - **Relocation** (growth, clear, assignment) raises the *floor*. Every
//!   cursor taken before it is dead.
//! - **Shifts** (insert, erase, pop) stamp the disturbed slots with the new
//!   epoch. Cursors at those positions taken before the stamp are dead;
//!   cursors before the first disturbed slot stay Live.

use log::trace;
use vessel_core::{AllocError, Epoch};

/// Per-array bookkeeping for cursor validity.
///
/// Holds one stamp per position a cursor has been able to reach, which is
/// `[0, max_len]` over the array's lifetime. The table follows the length
/// high-water mark, not the capacity.
#[derive(Clone, Debug)]
pub struct InvalidationTracker {
    /// Current epoch. Bumped by every invalidation.
    epoch: Epoch,
    /// Epoch of the last whole-array invalidation.
    floor: Epoch,
    /// Epoch at which each position was last disturbed.
    stamps: Vec<Epoch>,
}

impl InvalidationTracker {
    /// Create a tracker covering position 0 of an empty array.
    ///
    /// Returns [`AllocError::OutOfMemory`] if the stamp table cannot be
    /// allocated.
    pub fn new() -> Result<Self, AllocError> {
        let mut tracker = Self {
            epoch: Epoch::ZERO,
            floor: Epoch::ZERO,
            stamps: Vec::new(),
        };
        tracker.cover(0)?;
        Ok(tracker)
    }

    /// The current epoch.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Take a token for a new cursor.
    ///
    /// The token is the current epoch. Nothing is recorded, so dropping
    /// the cursor later needs no matching call.
    pub fn register(&self) -> Epoch {
        self.epoch
    }

    /// Make sure the stamp table has an entry for `position`.
    ///
    /// New entries start at the floor. No cursor can have reached a
    /// position the table never covered, so they disturb nothing. Call
    /// this before a mutation that raises the length to `position`.
    ///
    /// # Errors
    ///
    /// [`AllocError::OutOfMemory`] if the table cannot grow. The tracker is
    /// unchanged.
    pub fn cover(&mut self, position: usize) -> Result<(), AllocError> {
        if position < self.stamps.len() {
            return Ok(());
        }
        let needed = position
            .checked_add(1)
            .ok_or(AllocError::OutOfMemory { requested: position })?;
        self.stamps
            .try_reserve(needed - self.stamps.len())
            .map_err(|_| AllocError::OutOfMemory { requested: needed })?;
        self.stamps.resize(needed, self.floor);
        Ok(())
    }

    /// Whether a cursor holding `token` at `position` is still Live for an
    /// array of length `len`.
    pub fn is_live(&self, token: Epoch, position: usize, len: usize) -> bool {
        token >= self.floor
            && position <= len
            && self
                .stamps
                .get(position)
                .is_some_and(|&stamp| stamp <= token)
    }

    /// Invalidate every cursor positioned in `[position, end]`.
    ///
    /// `end` is inclusive so that the end position of the pre-mutation
    /// array is covered. Positions past the stamp table are ignored.
    pub fn invalidate_from(&mut self, position: usize, end: usize) {
        self.epoch = self.epoch.next();
        let last = end.min(self.stamps.len().saturating_sub(1));
        if position <= last {
            for stamp in &mut self.stamps[position..=last] {
                *stamp = self.epoch;
            }
        }
        trace!(
            "invalidated positions {position}..={last} at epoch {}",
            self.epoch
        );
    }

    /// Invalidate every cursor of the array.
    pub fn invalidate_all(&mut self) {
        self.epoch = self.epoch.next();
        self.floor = self.epoch;
        trace!("invalidated all cursors at epoch {}", self.epoch);
    }

    /// Number of positions the stamp table covers.
    #[cfg(test)]
    pub(crate) fn covered(&self) -> usize {
        self.stamps.len()
    }
}
