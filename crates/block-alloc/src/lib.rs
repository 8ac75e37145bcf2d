//! # Bounded Block Allocator
//!
//! A `malloc`/`free` pair for an abstract address space measured in blocks,
//! with every piece of bookkeeping held in fixed-size arrays. Nothing here
//! allocates from the heap, so the allocator works in `no_std` environments
//! before (or instead of) a global allocator.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  BlockAllocator                     │
//! │    • first-fit alloc, split from the front          │
//! │    • free with two-sided coalescing                 │
//! └────────────┬───────────────────────────┬────────────┘
//!              │                           │
//! ┌────────────▼────────────┐ ┌────────────▼────────────┐
//! │   FreeList<FREE>        │ │   AllocationTable<TABLE>│
//! │  sorted circular list   │ │  outstanding grants     │
//! │  of free segments       │ │  keyed by start block   │
//! └────────────┬────────────┘ └────────────┬────────────┘
//!              │                           │
//! ┌────────────▼───────────────────────────▼────────────┐
//! │           Segment / BlockAddress values             │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Free and allocated segments always partition the range the allocator was
//! created with.
//!
//! ## Capacities
//!
//! Both tables are sized by const generics and can be chosen independently:
//! `FREE` limits how fragmented the free space may become, `TABLE` how many
//! allocations may be outstanding at once. [`DefaultBlockAllocator`] uses
//! [`DEFAULT_CAPACITY`] for both.
//!
//! ## Errors
//!
//! Running out of space, running out of table slots, and freeing an unknown
//! handle are reported as [`AllocError`] values and leave the allocator
//! untouched. Broken internal invariants are bugs and panic.
//!
//! ## Concurrency
//!
//! The allocator is a plain value mutated through `&mut self`. Share it
//! between threads only behind a lock around both `alloc` and `free`.
//!
//! ## Example
//!
//! ```
//! use block_alloc::{AllocError, BlockAddress, DefaultBlockAllocator, Segment};
//!
//! let mut allocator = DefaultBlockAllocator::new(Segment::new(BlockAddress::new(0), 512));
//!
//! let a = allocator.alloc(10)?;
//! let b = allocator.alloc(20)?;
//! allocator.free(a)?;
//!
//! // First fit: the hole left by `a` is reused.
//! let c = allocator.alloc(5)?;
//! assert_eq!(c, a);
//!
//! allocator.free(b)?;
//! allocator.free(c)?;
//! assert_eq!(allocator.free(c), Err(AllocError::InvalidHandle(c)));
//! assert_eq!(allocator.usage().free_segments, 1);
//! # Ok::<(), AllocError>(())
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

mod allocator;
mod error;
mod table;
mod usage;

pub use allocator::BlockAllocator;
pub use block_freelist::{FreeList, FreeListError, SlotIndex};
pub use block_segment::{BlockAddress, Segment};
pub use error::{AllocError, Table};
pub use table::{AllocationTable, TableSlot};
pub use usage::Usage;

/// Capacity of each table in a [`DefaultBlockAllocator`].
pub const DEFAULT_CAPACITY: usize = 32;

/// A [`BlockAllocator`] tracking up to [`DEFAULT_CAPACITY`] free segments and
/// as many outstanding allocations.
pub type DefaultBlockAllocator = BlockAllocator<DEFAULT_CAPACITY, DEFAULT_CAPACITY>;
