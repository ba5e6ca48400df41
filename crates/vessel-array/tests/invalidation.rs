//! Cursor invalidation scenarios.
//!
//! Each test builds a small array, takes cursors, performs one structural
//! mutation, and checks which cursors survive. Surviving cursors must
//! still read the element they were taken at; dead ones must fail with
//! `InvalidIterator` and never return data.

use vessel_array::{CursorError, DynArray};

fn one_to_five() -> DynArray<i32> {
    let mut array = DynArray::with_capacity(10).unwrap();
    array.extend([1, 2, 3, 4, 5]);
    array
}

#[test]
fn insert_before_cursor_invalidates_it() {
    let mut array = one_to_five();
    let it = array.cursor_at(2).unwrap();
    assert_eq!(it.get(&array), Ok(&3));

    array.insert(1, 99).unwrap();

    assert_eq!(it.get(&array), Err(CursorError::InvalidIterator));
    let fresh = array.cursor_at(3).unwrap();
    assert_eq!(fresh.get(&array), Ok(&3));
}

#[test]
fn invalidated_cursor_cannot_advance() {
    let mut array = one_to_five();
    let mut it = array.cursor_at(2).unwrap();
    array.erase(0).unwrap();
    assert_eq!(it.advance(&array), Err(CursorError::InvalidIterator));
    assert_eq!(it.position(), 2);
}

#[test]
fn insert_after_cursor_keeps_it_live() {
    let mut array = one_to_five();
    let it = array.cursor_at(1).unwrap();
    array.insert(3, 99).unwrap();
    assert_eq!(it.get(&array), Ok(&2));
}

#[test]
fn insert_at_cursor_position_invalidates_it() {
    let mut array = one_to_five();
    let it = array.cursor_at(3).unwrap();
    array.insert(3, 99).unwrap();
    assert_eq!(it.get(&array), Err(CursorError::InvalidIterator));
}

#[test]
fn erase_invalidates_from_position() {
    let mut array = one_to_five();
    let before = array.cursor_at(1).unwrap();
    let at = array.cursor_at(2).unwrap();
    let after = array.cursor_at(4).unwrap();
    let end = array.end();

    let next = array.erase(2).unwrap();

    assert_eq!(before.get(&array), Ok(&2));
    assert_eq!(at.get(&array), Err(CursorError::InvalidIterator));
    assert_eq!(after.get(&array), Err(CursorError::InvalidIterator));
    assert!(!end.is_live(&array));
    assert_eq!(next.get(&array), Ok(&4));
}

#[test]
fn pop_back_keeps_earlier_cursors() {
    let mut array = one_to_five();
    let first = array.begin();
    let middle = array.cursor_at(3).unwrap();
    let last = array.cursor_at(4).unwrap();
    let end = array.end();

    array.pop_back();

    assert_eq!(first.get(&array), Ok(&1));
    assert_eq!(middle.get(&array), Ok(&4));
    assert_eq!(last.get(&array), Err(CursorError::InvalidIterator));
    assert_eq!(end.get(&array), Err(CursorError::InvalidIterator));
}

#[test]
fn pop_back_invalidation_survives_regrowth_over_slot() {
    let mut array = one_to_five();
    let last = array.cursor_at(4).unwrap();
    let end = array.end();
    array.pop_back();
    array.push_back(50).unwrap();
    array.push_back(60).unwrap();
    assert_eq!(last.get(&array), Err(CursorError::InvalidIterator));
    assert_eq!(end.get(&array), Err(CursorError::InvalidIterator));
}

#[test]
fn push_without_growth_keeps_cursors() {
    let mut array = one_to_five();
    let it = array.cursor_at(4).unwrap();
    array.push_back(6).unwrap();
    assert_eq!(it.get(&array), Ok(&5));
}

#[test]
fn growth_invalidates_every_cursor() {
    let mut array = DynArray::with_capacity(2).unwrap();
    array.push_back(1).unwrap();
    array.push_back(2).unwrap();
    let first = array.begin();
    let end = array.end();

    array.push_back(3).unwrap();

    assert_eq!(array.capacity(), 4);
    assert_eq!(array, [1, 2, 3]);
    assert_eq!(first.get(&array), Err(CursorError::InvalidIterator));
    assert!(!end.is_live(&array));
}

#[test]
fn growth_during_insert_invalidates_earlier_cursors() {
    let mut array = DynArray::with_capacity(3).unwrap();
    array.extend([1, 2, 3]);
    let first = array.begin();
    array.insert(3, 4).unwrap();
    assert_eq!(first.get(&array), Err(CursorError::InvalidIterator));
}

#[test]
fn invalidation_is_permanent() {
    let mut array = one_to_five();
    let it = array.cursor_at(0).unwrap();
    array.insert(0, 0).unwrap();
    array.erase(0).unwrap();
    // The element at position 0 is 1 again, but the cursor stays dead.
    assert_eq!(array[0], 1);
    assert_eq!(it.get(&array), Err(CursorError::InvalidIterator));
}

#[test]
fn cursors_from_different_arrays_are_incompatible() {
    let a = one_to_five();
    let b = one_to_five();
    for (pa, pb) in [(0, 0), (2, 2), (1, 4), (5, 5)] {
        let ca = a.cursor_at(pa).unwrap();
        let cb = b.cursor_at(pb).unwrap();
        assert_eq!(ca.equals(&cb), Err(CursorError::IncompatibleIterator));
        assert_eq!(cb.equals(&ca), Err(CursorError::IncompatibleIterator));
    }
}

#[test]
fn clone_does_not_share_cursors() {
    let a = one_to_five();
    let b = a.clone();
    let cursor = a.begin();
    assert_eq!(cursor.get(&b), Err(CursorError::IncompatibleIterator));
    assert_eq!(
        cursor.equals(&b.begin()),
        Err(CursorError::IncompatibleIterator)
    );
}

#[test]
fn cursor_of_dropped_array_never_resolves_elsewhere() {
    let cursor = {
        let array = one_to_five();
        array.begin()
    };
    let replacement = one_to_five();
    assert_eq!(
        cursor.get(&replacement),
        Err(CursorError::IncompatibleIterator)
    );
}

#[test]
fn same_array_cursors_compare_by_position() {
    let array = one_to_five();
    let a = array.cursor_at(2).unwrap();
    let mut b = array.cursor_at(1).unwrap();
    assert_eq!(a.equals(&b), Ok(false));
    b.advance(&array).unwrap();
    assert_eq!(a.equals(&b), Ok(true));
}
