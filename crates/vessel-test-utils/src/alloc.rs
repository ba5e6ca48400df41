//! Instrumented allocators.

#![allow(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::mem;
use std::ptr::NonNull;
use std::rc::Rc;

use indexmap::IndexMap;
use vessel_core::{AllocError, Allocator, Heap};

/// Snapshot of a [`CountingAllocator`]'s counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Successful `allocate` calls.
    pub allocations: usize,
    /// `deallocate` calls.
    pub deallocations: usize,
    /// `construct` calls, including moves during growth and shifts.
    pub constructs: usize,
    /// `destroy` calls.
    pub destroys: usize,
    /// Non-empty blocks allocated and not yet released.
    pub live_blocks: usize,
}

#[derive(Debug, Default)]
struct Ledger {
    /// Block address -> element count, for non-empty blocks only.
    live: IndexMap<usize, usize>,
    stats: AllocStats,
}

/// Heap allocator that records every call.
///
/// Clones share one ledger, so an array and its copies report together.
/// Releasing a block twice, releasing an unknown block, or releasing with
/// the wrong element count panics.
#[derive(Clone, Debug, Default)]
pub struct CountingAllocator {
    ledger: Rc<RefCell<Ledger>>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters.
    pub fn stats(&self) -> AllocStats {
        let ledger = self.ledger.borrow();
        AllocStats {
            live_blocks: ledger.live.len(),
            ..ledger.stats
        }
    }

    /// Element counts of the blocks still live, oldest first.
    pub fn live_block_sizes(&self) -> Vec<usize> {
        self.ledger.borrow().live.values().copied().collect()
    }
}

// SAFETY: every block comes from `Heap`, which upholds the contract.
unsafe impl<T> Allocator<T> for CountingAllocator {
    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let block = Heap.allocate(n)?;
        let mut ledger = self.ledger.borrow_mut();
        ledger.stats.allocations += 1;
        if n != 0 && mem::size_of::<T>() != 0 {
            ledger.live.insert(block.as_ptr() as usize, n);
        }
        Ok(block)
    }

    unsafe fn deallocate(&self, block: NonNull<T>, n: usize) {
        {
            let mut ledger = self.ledger.borrow_mut();
            ledger.stats.deallocations += 1;
            if n != 0 && mem::size_of::<T>() != 0 {
                match ledger.live.shift_remove(&(block.as_ptr() as usize)) {
                    Some(recorded) => assert_eq!(
                        recorded, n,
                        "block released with {n} elements, allocated with {recorded}"
                    ),
                    None => panic!("released a block that is not live"),
                }
            }
        }
        // SAFETY: forwarded contract; the block came from `Heap`.
        unsafe { Heap.deallocate(block, n) }
    }

    unsafe fn construct(&self, slot: NonNull<T>, value: T) {
        self.ledger.borrow_mut().stats.constructs += 1;
        // SAFETY: forwarded contract.
        unsafe { Heap.construct(slot, value) }
    }

    unsafe fn destroy(&self, slot: NonNull<T>) {
        self.ledger.borrow_mut().stats.destroys += 1;
        // SAFETY: forwarded contract.
        unsafe { Heap.destroy(slot) }
    }
}

/// Heap allocator that refuses any single request above a limit.
///
/// Used to drive the out-of-memory path deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundedAllocator {
    max_elements: usize,
}

impl BoundedAllocator {
    /// Refuse requests for more than `max_elements` elements.
    pub fn new(max_elements: usize) -> Self {
        Self { max_elements }
    }

    pub fn max_elements(&self) -> usize {
        self.max_elements
    }
}

// SAFETY: every block comes from `Heap`, which upholds the contract.
unsafe impl<T> Allocator<T> for BoundedAllocator {
    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        if n > self.max_elements {
            return Err(AllocError::OutOfMemory { requested: n });
        }
        Heap.allocate(n)
    }

    unsafe fn deallocate(&self, block: NonNull<T>, n: usize) {
        // SAFETY: forwarded contract; the block came from `Heap`.
        unsafe { Heap.deallocate(block, n) }
    }
}

/// Heap allocator that grants a fixed number of `allocate` calls and
/// refuses every call after that.
///
/// Clones share the quota, so a copy made through the allocator draws on
/// the same budget as the original.
#[derive(Clone, Debug)]
pub struct QuotaAllocator {
    remaining: Rc<Cell<usize>>,
}

impl QuotaAllocator {
    /// Grant `grants` allocations.
    pub fn new(grants: usize) -> Self {
        Self {
            remaining: Rc::new(Cell::new(grants)),
        }
    }

    /// Allocations still available.
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }
}

// SAFETY: every block comes from `Heap`, which upholds the contract.
unsafe impl<T> Allocator<T> for QuotaAllocator {
    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let left = self.remaining.get();
        if left == 0 {
            return Err(AllocError::OutOfMemory { requested: n });
        }
        let block = Heap.allocate(n)?;
        self.remaining.set(left - 1);
        Ok(block)
    }

    unsafe fn deallocate(&self, block: NonNull<T>, n: usize) {
        // SAFETY: forwarded contract; the block came from `Heap`.
        unsafe { Heap.deallocate(block, n) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_allocation_round_trip() {
        let alloc = CountingAllocator::new();
        let block: NonNull<u32> = alloc.allocate(4).unwrap();
        assert_eq!(alloc.stats().live_blocks, 1);
        assert_eq!(alloc.live_block_sizes(), vec![4]);
        unsafe {
            alloc.construct(block, 7);
            alloc.destroy(block);
            alloc.deallocate(block, 4);
        }
        let stats = alloc.stats();
        assert_eq!(stats.allocations, 1);
        assert_eq!(stats.deallocations, 1);
        assert_eq!(stats.constructs, 1);
        assert_eq!(stats.destroys, 1);
        assert_eq!(stats.live_blocks, 0);
    }

    #[test]
    fn clones_share_ledger() {
        let a = CountingAllocator::new();
        let b = a.clone();
        let block: NonNull<u8> = b.allocate(1).unwrap();
        assert_eq!(a.stats().live_blocks, 1);
        unsafe { a.deallocate(block, 1) };
        assert_eq!(b.stats().live_blocks, 0);
    }

    #[test]
    #[should_panic(expected = "not live")]
    fn double_release_panics() {
        let alloc = CountingAllocator::new();
        let block: NonNull<u64> = alloc.allocate(2).unwrap();
        unsafe {
            alloc.deallocate(block, 2);
            alloc.deallocate(block, 2);
        }
    }

    #[test]
    fn bounded_refuses_large_requests() {
        let alloc = BoundedAllocator::new(4);
        let ok: Result<NonNull<u8>, _> = alloc.allocate(4);
        let block = ok.unwrap();
        unsafe { alloc.deallocate(block, 4) };
        let refused: Result<NonNull<u8>, _> = alloc.allocate(5);
        assert_eq!(refused, Err(AllocError::OutOfMemory { requested: 5 }));
    }

    #[test]
    fn quota_is_shared_and_exhausts() {
        let alloc = QuotaAllocator::new(1);
        let copy = alloc.clone();
        let block: NonNull<u16> = copy.allocate(3).unwrap();
        assert_eq!(alloc.remaining(), 0);
        let refused: Result<NonNull<u16>, _> = alloc.allocate(1);
        assert_eq!(refused, Err(AllocError::OutOfMemory { requested: 1 }));
        unsafe { alloc.deallocate(block, 3) };
        assert_eq!(alloc.remaining(), 0);
    }
}
