/// Point-in-time block accounting of a [`BlockAllocator`](crate::BlockAllocator).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Usage {
    /// Blocks in free segments.
    pub free_blocks: u64,
    /// Blocks in outstanding allocations.
    pub allocated_blocks: u64,
    /// Number of free-list entries.
    pub free_segments: usize,
    /// Number of outstanding allocations.
    pub allocations: usize,
    /// Length of the largest free segment.
    pub largest_free: u64,
}

impl Usage {
    /// Blocks managed in total.
    #[inline]
    #[must_use]
    pub const fn total_blocks(&self) -> u64 {
        self.free_blocks + self.allocated_blocks
    }
}
