//! Array and cursor error types.

use std::error::Error;
use std::fmt;

use vessel_core::AllocError;

/// Errors that can occur during array operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// The allocator refused a request during construction, growth, or copy.
    OutOfMemory {
        /// The underlying allocator error.
        source: AllocError,
    },
    /// Doubling the capacity would overflow `usize`.
    CapacityOverflow {
        /// Capacity at the time of the failed growth.
        capacity: usize,
    },
    /// A position argument lies outside the range the operation accepts.
    PositionOutOfRange {
        /// The rejected position.
        position: usize,
        /// Array length at the time of the call.
        len: usize,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { source } => write!(f, "array allocation failed: {source}"),
            Self::CapacityOverflow { capacity } => {
                write!(f, "capacity overflow: cannot grow beyond {capacity} slots")
            }
            Self::PositionOutOfRange { position, len } => {
                write!(f, "position {position} out of range for length {len}")
            }
        }
    }
}

impl Error for ArrayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OutOfMemory { source } => Some(source),
            _ => None,
        }
    }
}

impl From<AllocError> for ArrayError {
    fn from(source: AllocError) -> Self {
        Self::OutOfMemory { source }
    }
}

/// Errors from using a [`Cursor`](crate::Cursor).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorError {
    /// The cursor is unbound, or a structural mutation has invalidated it.
    InvalidIterator,
    /// The cursor belongs to a different array than the one it was used with.
    IncompatibleIterator,
    /// The cursor is Live at the end position, where there is no element.
    PastEnd {
        /// The end position.
        position: usize,
    },
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIterator => write!(f, "iterator invalid"),
            Self::IncompatibleIterator => write!(f, "iterator incompatible"),
            Self::PastEnd { position } => {
                write!(f, "iterator at end position {position} has no element")
            }
        }
    }
}

impl Error for CursorError {}
