//! Allocation error type.

use std::error::Error;
use std::fmt;

/// Errors raised by an [`Allocator`](crate::Allocator).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The allocator could not provide storage for the request.
    OutOfMemory {
        /// Number of elements requested.
        requested: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: could not allocate {requested} elements")
            }
        }
    }
}

impl Error for AllocError {}
