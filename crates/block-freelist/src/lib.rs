//! # Fixed-Capacity Free-Segment List
//!
//! An address-sorted, circular, singly linked list of free [`Segment`]s that
//! lives entirely in a fixed array of `N` slots. Links are slot indices, not
//! pointers, so the list needs neither a heap nor `unsafe`.
//!
//! ## Layout
//!
//! ```text
//!   head ─► slot 0 ──► slot 3 ──► slot 2 ─┐
//!           [0, 10)    [20, 25)   [40, 70) │
//!              ▲                           │
//!              └───────────────────────────┘
//!
//!   slots:  0: [0, 10)  → 3
//!           1: vacant
//!           2: [40, 70) → 0
//!           3: [20, 25) → 2
//!           4: vacant
//! ```
//!
//! Walking `next` from [`FreeList::head`] yields the segments in ascending
//! address order and returns to the head after exactly [`FreeList::len`]
//! steps.
//!
//! ## Slot Relocation
//!
//! There are no backward links. Two operations would ordinarily need the
//! predecessor of an entry and instead move payloads between slots:
//!
//! - **Inserting a new minimum**: the old minimum's payload is copied into
//!   the freshly claimed slot and the new segment takes over the head slot.
//!   Whoever pointed at the head slot still does, and finds the new minimum
//!   there.
//! - **Removing an entry**: the successor's payload is copied into the
//!   removed entry's slot and the successor's slot is released instead.
//!
//! As a consequence a [`SlotIndex`] is only meaningful until the next
//! mutating call. Never keep one across [`FreeList::insert`],
//! [`FreeList::remove`], or [`FreeList::merge_with_next`].
//!
//! ## Invariants
//!
//! - At least one entry exists at all times.
//! - Entries are sorted by start address, never overlap, and no two entries
//!   are contiguous (neighbors are always coalesced by the owner).
//! - Every operation does at most `O(N)` work.
//!
//! [`FreeList::is_well_formed`] checks all of the above; it runs as a
//! `debug_assert!` after every structural change.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod circular;
mod iter;

pub use block_segment::{BlockAddress, Segment};
pub use circular::{FreeList, FreeListError, SlotIndex};
pub use iter::{Entries, Iter};
