//! Test utilities for Vessel development.
//!
//! Provides instrumented [`Allocator`](vessel_core::Allocator)
//! implementations ([`CountingAllocator`], [`BoundedAllocator`],
//! [`QuotaAllocator`]) and
//! drop-counting element fixtures ([`DropLedger`], [`Tracked`]).

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod alloc;
pub mod fixtures;

pub use alloc::{AllocStats, BoundedAllocator, CountingAllocator, QuotaAllocator};
pub use fixtures::{DropLedger, Tracked};
