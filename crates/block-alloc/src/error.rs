//! Error types for block allocation.

use block_freelist::FreeListError;
use block_segment::BlockAddress;
use core::fmt;

/// The fixed-capacity table that ran out of slots.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Table {
    /// The free-segment list.
    FreeList,
    /// The table of outstanding allocations.
    Allocations,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeList => f.write_str("free list"),
            Self::Allocations => f.write_str("allocation table"),
        }
    }
}

/// Errors reported by [`BlockAllocator`](crate::BlockAllocator).
///
/// All of them leave the allocator unchanged.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum AllocError {
    /// A request for zero blocks.
    #[error("cannot allocate zero blocks")]
    ZeroSized,

    /// No single free segment can hold the request, even if the total amount
    /// of free blocks would.
    #[error(
        "out of memory: requested {requested} blocks, largest available run is {largest_available} blocks"
    )]
    OutOfMemory {
        requested: u64,
        largest_available: u64,
    },

    /// A fixed-capacity table has no slot left for a new entry.
    #[error("{table} is full ({capacity} entries)")]
    CapacityExceeded { table: Table, capacity: usize },

    /// The handle is unknown or was already freed.
    #[error("no outstanding allocation starts at block {0}")]
    InvalidHandle(BlockAddress),
}

impl From<FreeListError> for AllocError {
    fn from(value: FreeListError) -> Self {
        match value {
            FreeListError::CapacityExceeded { capacity } => Self::CapacityExceeded {
                table: Table::FreeList,
                capacity,
            },
        }
    }
}
