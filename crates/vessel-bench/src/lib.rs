//! Benchmark workloads for Vessel containers.
//!
//! Provides deterministic operation sequences for benchmarking and
//! comparison against `Vec`:
//!
//! - [`random_ops`]: seeded mix of push, pop, insert, and erase
//! - [`apply_ops`]: replay a sequence against a [`DynArray`]
//! - [`apply_ops_vec`]: replay the same sequence against a `Vec`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use vessel_array::DynArray;
use vessel_core::Allocator;

/// One structural operation in a benchmark workload.
///
/// Positions are stored as raw seeds and reduced modulo the current
/// length at replay time, so a sequence is valid for any starting array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Append the value.
    Push(u64),
    /// Remove the last element.
    Pop,
    /// Insert the value at `seed % (len + 1)`.
    Insert { seed: u64, value: u64 },
    /// Erase at `seed % len`; skipped when empty.
    Erase { seed: u64 },
}

/// Build `count` operations from `seed`.
///
/// Pushes make up half the mix so the array tends to grow.
pub fn random_ops(seed: u64, count: usize) -> Vec<Op> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let roll = rng.next_u32() % 8;
            let value = rng.next_u64();
            match roll {
                0..=3 => Op::Push(value),
                4 => Op::Pop,
                5 | 6 => Op::Insert {
                    seed: rng.next_u64(),
                    value,
                },
                _ => Op::Erase {
                    seed: rng.next_u64(),
                },
            }
        })
        .collect()
}

/// Replay `ops` against `array`.
///
/// # Panics
///
/// Panics if the allocator refuses a growth request.
pub fn apply_ops<A: Allocator<u64>>(array: &mut DynArray<u64, A>, ops: &[Op]) {
    for op in ops {
        match *op {
            Op::Push(value) => array.push_back(value).unwrap(),
            Op::Pop => array.pop_back(),
            Op::Insert { seed, value } => {
                let position = (seed % (array.len() as u64 + 1)) as usize;
                array.insert(position, value).unwrap();
            }
            Op::Erase { seed } => {
                if !array.is_empty() {
                    let position = (seed % array.len() as u64) as usize;
                    array.erase(position).unwrap();
                }
            }
        }
    }
}

/// Replay `ops` against a `Vec` as a baseline.
pub fn apply_ops_vec(vec: &mut Vec<u64>, ops: &[Op]) {
    for op in ops {
        match *op {
            Op::Push(value) => vec.push(value),
            Op::Pop => {
                vec.pop();
            }
            Op::Insert { seed, value } => {
                let position = (seed % (vec.len() as u64 + 1)) as usize;
                vec.insert(position, value);
            }
            Op::Erase { seed } => {
                if !vec.is_empty() {
                    let position = (seed % vec.len() as u64) as usize;
                    vec.remove(position);
                }
            }
        }
    }
}
