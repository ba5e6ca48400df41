//! Element and storage lifecycle accounting.
//!
//! Uses the instrumented allocators from `vessel-test-utils` to check that
//! every constructed element is destroyed exactly once, every block is
//! released exactly once, and a refused allocation leaves the array intact.

use vessel_array::{ArrayError, CursorError, DynArray};
use vessel_core::AllocError;
use vessel_test_utils::{
    BoundedAllocator, CountingAllocator, DropLedger, QuotaAllocator, Tracked,
};

#[test]
fn drop_destroys_each_element_once_and_releases_storage() {
    let alloc = CountingAllocator::new();
    let ledger = DropLedger::new();
    {
        let mut array = DynArray::with_capacity_in(2, alloc.clone()).unwrap();
        for v in 0..9 {
            array.push_back(ledger.track(v)).unwrap();
        }
        assert_eq!(ledger.drops(), 0);
    }
    assert_eq!(ledger.drops(), 9);
    let stats = alloc.stats();
    assert_eq!(stats.live_blocks, 0);
    assert_eq!(stats.allocations, stats.deallocations);
    assert_eq!(stats.destroys, 9);
}

#[test]
fn growth_moves_without_dropping() {
    let alloc = CountingAllocator::new();
    let ledger = DropLedger::new();
    let mut array = DynArray::with_capacity_in(1, alloc.clone()).unwrap();
    for v in 0..4 {
        array.push_back(ledger.track(v)).unwrap();
    }
    // Capacity went 1 -> 2 -> 4; three blocks were allocated, two released.
    assert_eq!(array.capacity(), 4);
    assert_eq!(ledger.drops(), 0);
    let stats = alloc.stats();
    assert_eq!(stats.allocations, 3);
    assert_eq!(stats.deallocations, 2);
    assert_eq!(alloc.live_block_sizes(), vec![4]);
    assert_eq!(stats.destroys, 0);
}

#[test]
fn pop_and_erase_destroy_exactly_one() {
    let ledger = DropLedger::new();
    let mut array: DynArray<Tracked<i32>> = DynArray::with_capacity(8).unwrap();
    for v in 0..5 {
        array.push_back(ledger.track(v)).unwrap();
    }
    array.pop_back();
    assert_eq!(ledger.drops(), 1);
    array.erase(1).unwrap();
    assert_eq!(ledger.drops(), 2);
    let values: Vec<i32> = array.iter().map(|t| *t.value()).collect();
    assert_eq!(values, vec![0, 2, 3]);
    array.insert(0, ledger.track(-1)).unwrap();
    assert_eq!(ledger.drops(), 2);
    drop(array);
    assert_eq!(ledger.drops(), 6);
}

#[test]
fn clear_destroys_all_and_keeps_block() {
    let alloc = CountingAllocator::new();
    let ledger = DropLedger::new();
    let mut array = DynArray::with_capacity_in(4, alloc.clone()).unwrap();
    array.extend((0..3).map(|v| ledger.track(v)));
    array.clear();
    assert_eq!(ledger.drops(), 3);
    assert_eq!(alloc.stats().live_blocks, 1);
    assert_eq!(array.capacity(), 4);
}

#[test]
fn copy_owns_separate_storage() {
    let alloc = CountingAllocator::new();
    let ledger = DropLedger::new();
    let mut a = DynArray::with_capacity_in(4, alloc.clone()).unwrap();
    a.extend((0..3).map(|v| ledger.track(v)));
    let mut b = a.clone();
    assert_eq!(alloc.stats().live_blocks, 2);

    b.push_back(ledger.track(3)).unwrap();
    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 4);

    drop(b);
    assert_eq!(ledger.drops(), 4);
    let values: Vec<i32> = a.iter().map(|t| *t.value()).collect();
    assert_eq!(values, vec![0, 1, 2]);
    drop(a);
    assert_eq!(ledger.drops(), 7);
    assert_eq!(alloc.stats().live_blocks, 0);
}

#[test]
fn assignment_destroys_previous_contents() {
    let ledger = DropLedger::new();
    let mut source: DynArray<Tracked<i32>> = DynArray::with_capacity(2).unwrap();
    source.push_back(ledger.track(10)).unwrap();
    let mut target: DynArray<Tracked<i32>> = DynArray::with_capacity(4).unwrap();
    target.extend((0..3).map(|v| ledger.track(v)));

    target.try_assign_from(&source).unwrap();

    assert_eq!(ledger.drops(), 3);
    assert_eq!(target.len(), 1);
    assert_eq!(target.capacity(), 2);
    assert_eq!(*target[0].value(), 10);
}

#[test]
fn refused_growth_leaves_array_intact() {
    let mut array = DynArray::with_capacity_in(2, BoundedAllocator::new(2)).unwrap();
    array.push_back(1).unwrap();
    array.push_back(2).unwrap();
    let cursor = array.begin();

    let err = array.push_back(3).unwrap_err();

    assert_eq!(
        err,
        ArrayError::OutOfMemory {
            source: AllocError::OutOfMemory { requested: 4 }
        }
    );
    assert_eq!(array, [1, 2]);
    assert_eq!(array.capacity(), 2);
    assert_eq!(cursor.get(&array), Ok(&1));
}

#[test]
fn refused_growth_during_insert_leaves_array_intact() {
    let mut array = DynArray::with_capacity_in(2, BoundedAllocator::new(3)).unwrap();
    array.extend([1, 2]);
    let err = array.insert(0, 0).unwrap_err();
    assert!(matches!(err, ArrayError::OutOfMemory { .. }));
    assert_eq!(array, [1, 2]);
}

#[test]
fn refused_copy_reports_out_of_memory() {
    let mut array = DynArray::with_capacity_in(4, QuotaAllocator::new(1)).unwrap();
    array.extend([1, 2, 3]);

    let err = array.try_clone().unwrap_err();

    assert_eq!(
        err,
        ArrayError::OutOfMemory {
            source: AllocError::OutOfMemory { requested: 4 }
        }
    );
    assert_eq!(array, [1, 2, 3]);
}

#[test]
fn refused_assignment_leaves_target_intact() {
    let mut source = DynArray::with_capacity_in(2, QuotaAllocator::new(1)).unwrap();
    source.push_back(9).unwrap();
    let mut target = DynArray::with_capacity_in(4, QuotaAllocator::new(1)).unwrap();
    target.extend([1, 2, 3]);
    let id = target.id();
    let second = target.cursor_at(1).unwrap();
    let end = target.end();

    let err = target.try_assign_from(&source).unwrap_err();

    assert!(matches!(err, ArrayError::OutOfMemory { .. }));
    assert_eq!(target, [1, 2, 3]);
    assert_eq!(target.capacity(), 4);
    assert_eq!(target.id(), id);
    assert_eq!(second.get(&target), Ok(&2));
    assert_eq!(end.get(&target), Err(CursorError::PastEnd { position: 3 }));
    assert!(end.is_live(&target));
}

#[test]
fn refused_initial_allocation() {
    let result: Result<DynArray<u8, _>, _> =
        DynArray::with_capacity_in(16, BoundedAllocator::new(8));
    assert!(matches!(result, Err(ArrayError::OutOfMemory { .. })));
}

#[test]
fn default_constructed_array_uses_ten_slots() {
    let array = DynArray::<u32, _>::new_in(CountingAllocator::new()).unwrap();
    assert_eq!(array.capacity(), 10);
    assert_eq!(array.allocator().live_block_sizes(), vec![10]);
}
