//! Array construction parameters.

/// Configuration for a [`DynArray`](crate::DynArray).
///
/// Growth always doubles the capacity; only the starting size is
/// configurable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayConfig {
    /// Number of slots allocated up front.
    ///
    /// Default: 10. Zero is allowed; the first push then grows to 1.
    pub initial_capacity: usize,
}

impl ArrayConfig {
    /// Default number of slots allocated by [`DynArray::new`](crate::DynArray::new).
    pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

    /// Create a config with the given initial capacity.
    pub fn new(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}
