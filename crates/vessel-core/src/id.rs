//! Strongly-typed identifiers for containers and mutation epochs.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArrayId`] allocation.
static ARRAY_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a container.
///
/// Allocated from a monotonic atomic counter via [`ArrayId::next`]. Two
/// distinct containers always have different IDs, and an ID is never
/// handed out twice within a process. Cursors carry the ID of the
/// container that created them in place of a pointer back to it, so a
/// cursor can never resolve against a container that was dropped and
/// replaced by another one at the same address.
///
/// Cloning a container allocates a fresh ID for the copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(u64);

impl ArrayId {
    /// Allocate a fresh, unique instance ID.
    ///
    /// Thread-safe.
    pub fn next() -> Self {
        Self(ARRAY_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing structural-mutation counter.
///
/// Each container owns one. It advances on every insert, erase, pop,
/// growth, or clear, and cursors remember the value they last validated
/// against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The epoch of a freshly created container.
    pub const ZERO: Epoch = Epoch(0);

    /// The epoch following this one.
    ///
    /// Saturates at `u64::MAX`. At one mutation per nanosecond that takes
    /// roughly 584 years to reach.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Epoch {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
