//! # Block Addresses and Segments
//!
//! Strongly typed values describing ranges of an abstract, block-granular
//! address space. Nothing in this crate owns memory; the types only describe
//! where a run of blocks starts and how long it is.
//!
//! ## Overview
//!
//! | Type | Description |
//! |------|-------------|
//! | [`BlockAddress`] | The index of a single block in the managed address space. |
//! | [`Segment`] | A half-open run of blocks `[start, start + length)` with `length > 0`. |
//!
//! Sizes and addresses are counted in blocks, never in bytes. The mapping of
//! a block to actual storage is up to whoever embeds the allocator.
//!
//! ## Segment Arithmetic
//!
//! The free-list allocator is built from three pure operations:
//!
//! - [`Segment::is_contiguous_with`]: the end of one segment is the start of the other.
//! - [`Segment::merge`]: fuse two contiguous segments into one.
//! - [`Segment::extract_front`]: carve the first `n` blocks off a segment,
//!   leaving the higher addresses behind.
//!
//! ```rust
//! # use block_segment::*;
//! let mut free = Segment::new(BlockAddress::new(0), 512);
//!
//! // Take the first 10 blocks.
//! let grant = free.extract_front(10);
//! assert_eq!(grant, Segment::new(BlockAddress::new(0), 10));
//! assert_eq!(free, Segment::new(BlockAddress::new(10), 502));
//!
//! // Give them back.
//! assert!(grant.is_contiguous_with(free));
//! assert_eq!(grant.merge(free), Segment::new(BlockAddress::new(0), 512));
//! ```
//!
//! ## Design Notes
//!
//! - [`BlockAddress`] is `#[repr(transparent)]` over `u64` and implements
//!   `Copy`, `Eq`, `Ord`, and `Hash`.
//! - Segments are values. "Shrinking" a segment replaces it with a newly
//!   computed one.
//! - Contract violations (zero length, merging non-neighbors, extracting the
//!   whole segment) panic. They indicate a bug in the caller, not a runtime
//!   condition.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod block_address;
mod segment;

pub use block_address::BlockAddress;
pub use segment::Segment;
