//! First-fit block allocator over a fixed-capacity free list.
//!
//! [`BlockAllocator`] owns a [`FreeList`] describing every block not handed
//! out and an [`AllocationTable`] describing every block that is. Together
//! they always partition the managed range.
//!
//! # Allocation
//! The free list is scanned from the lowest address for the first segment
//! of at least the requested size. A larger segment is split from the front
//! and keeps its slot; an exact fit is removed from the list.
//!
//! # Deallocation
//! The freed segment is merged into a contiguous free neighbor if there is
//! one. Since the scan runs in address order, that neighbor is the lower one
//! whenever both exist, so the enlarged entry may afterwards touch its
//! successor and is merged once more. Without any neighbor the segment is
//! inserted as a new entry.

use crate::{AllocError, AllocationTable, Table, Usage};
use block_freelist::{FreeList, Iter};
use block_segment::{BlockAddress, Segment};
use log::{debug, warn};

/// A bounded first-fit allocator over the block range given at construction.
///
/// `FREE` bounds the number of free segments (fragmentation), `TABLE` the
/// number of simultaneously outstanding allocations.
///
/// # Example
/// ```
/// use block_alloc::{BlockAddress, BlockAllocator, Segment};
///
/// let mut allocator = BlockAllocator::<8, 8>::new(Segment::new(BlockAddress::new(0), 512));
///
/// let a = allocator.alloc(10).unwrap();
/// let b = allocator.alloc(20).unwrap();
/// assert_eq!(a, BlockAddress::new(0));
/// assert_eq!(b, BlockAddress::new(10));
///
/// allocator.free(a).unwrap();
/// allocator.free(b).unwrap();
/// assert_eq!(allocator.free_segments().collect::<Vec<_>>(), [allocator.whole()]);
/// ```
pub struct BlockAllocator<const FREE: usize, const TABLE: usize> {
    whole: Segment,
    free_list: FreeList<FREE>,
    table: AllocationTable<TABLE>,
}

impl<const FREE: usize, const TABLE: usize> BlockAllocator<FREE, TABLE> {
    /// Manage the blocks of `whole`, all of them initially free.
    #[must_use]
    pub const fn new(whole: Segment) -> Self {
        Self {
            whole,
            free_list: FreeList::new(whole),
            table: AllocationTable::new(),
        }
    }

    /// Allocate `size` contiguous blocks and return the address of the first.
    ///
    /// The address is the handle to pass to [`free`](Self::free).
    ///
    /// # Errors
    /// - [`AllocError::ZeroSized`] if `size` is zero.
    /// - [`AllocError::CapacityExceeded`] if the allocation table is full.
    /// - [`AllocError::OutOfMemory`] if no free segment is large enough. The
    ///   last free segment is never handed out whole, since the free list
    ///   cannot become empty.
    pub fn alloc(&mut self, size: u64) -> Result<BlockAddress, AllocError> {
        if size == 0 {
            warn!("rejecting zero-sized allocation");
            return Err(AllocError::ZeroSized);
        }

        let Some(record) = self.table.vacant() else {
            warn!("cannot allocate {size} blocks: allocation table is full");
            return Err(AllocError::CapacityExceeded {
                table: Table::Allocations,
                capacity: TABLE,
            });
        };

        let fit = self
            .free_list
            .entries()
            .find(|(_, segment)| segment.length() >= size);

        let granted = match fit {
            Some((slot, segment)) if segment.length() > size => {
                self.free_list.segment_mut(slot).extract_front(size)
            }
            Some((slot, _)) if self.free_list.len() > 1 => self.free_list.remove(slot),
            _ => {
                let largest_available = self.largest_available();
                warn!(
                    "cannot allocate {size} blocks: largest available run is {largest_available} blocks"
                );
                return Err(AllocError::OutOfMemory {
                    requested: size,
                    largest_available,
                });
            }
        };

        self.table.occupy(record, granted);
        debug!("allocated {granted} ({size} blocks)");
        self.debug_check();
        Ok(granted.start())
    }

    /// Return the allocation starting at `handle` to the free list.
    ///
    /// # Errors
    /// - [`AllocError::InvalidHandle`] if no outstanding allocation starts at
    ///   `handle`, including a second `free` of the same handle.
    /// - [`AllocError::CapacityExceeded`] if the freed segment touches no free
    ///   segment and the free list has no slot left for it. The allocation
    ///   then stays outstanding.
    pub fn free(&mut self, handle: BlockAddress) -> Result<(), AllocError> {
        let Some(record) = self.table.find(handle) else {
            warn!("cannot free block {handle}: no such allocation");
            return Err(AllocError::InvalidHandle(handle));
        };

        let segment = self.table.segment(record);
        if let Err(e) = self.release(segment) {
            warn!("cannot free {segment}: {e}");
            return Err(e);
        }

        let _ = self.table.vacate(record);
        debug!("freed {segment}");
        self.debug_check();
        Ok(())
    }

    /// Fold `segment` back into the free list, coalescing with its neighbors.
    fn release(&mut self, segment: Segment) -> Result<(), AllocError> {
        let neighbor = self
            .free_list
            .entries()
            .find(|(_, free)| free.is_contiguous_with(segment))
            .map(|(slot, _)| slot);

        let Some(slot) = neighbor else {
            self.free_list.insert(segment)?;
            return Ok(());
        };

        let merged = self.free_list.segment(slot).merge(segment);
        *self.free_list.segment_mut(slot) = merged;
        debug!("coalesced {segment} into {merged}");

        let next = self.free_list.next(slot);
        if next != self.free_list.head() && merged.is_contiguous_with(self.free_list.segment(next))
        {
            let merged = self.free_list.merge_with_next(slot);
            debug!("coalesced upper neighbor into {merged}");
        }

        Ok(())
    }

    /// The largest request [`alloc`](Self::alloc) could currently satisfy.
    #[must_use]
    pub fn largest_available(&self) -> u64 {
        let largest = self.largest_free();
        if self.free_list.len() == 1 {
            largest - 1
        } else {
            largest
        }
    }

    fn largest_free(&self) -> u64 {
        self.free_list.iter().map(Segment::length).max().unwrap_or(0)
    }

    /// The managed range.
    #[inline]
    #[must_use]
    pub const fn whole(&self) -> Segment {
        self.whole
    }

    /// Free segments in ascending address order.
    #[inline]
    #[must_use]
    pub const fn free_segments(&self) -> Iter<'_, FREE> {
        self.free_list.iter()
    }

    /// Outstanding allocations in allocation-table order.
    pub fn allocations(&self) -> impl Iterator<Item = Segment> + '_ {
        self.table.iter()
    }

    /// Read-only view of the free list.
    #[inline]
    #[must_use]
    pub const fn free_list(&self) -> &FreeList<FREE> {
        &self.free_list
    }

    /// Read-only view of the allocation table.
    #[inline]
    #[must_use]
    pub const fn allocation_table(&self) -> &AllocationTable<TABLE> {
        &self.table
    }

    /// Snapshot of free and allocated block counts.
    #[must_use]
    pub fn usage(&self) -> Usage {
        Usage {
            free_blocks: self.free_list.iter().map(Segment::length).sum(),
            allocated_blocks: self.table.iter().map(Segment::length).sum(),
            free_segments: self.free_list.len(),
            allocations: self.table.len(),
            largest_free: self.largest_free(),
        }
    }

    /// Whether the free list is well formed and free plus allocated segments
    /// partition the managed range without gaps or overlaps.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if !self.free_list.is_well_formed() {
            return false;
        }

        let all = self.free_list.iter().chain(self.table.iter());
        let mut total = 0u64;
        for (i, segment) in all.clone().enumerate() {
            if segment.start() < self.whole.start() || segment.end() > self.whole.end() {
                return false;
            }
            if all.clone().skip(i + 1).any(|other| segment.overlaps(other)) {
                return false;
            }
            total += segment.length();
        }
        total == self.whole.length()
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.is_consistent(), "allocator no longer partitions {}", self.whole);
    }
}

impl<const FREE: usize, const TABLE: usize> core::fmt::Debug for BlockAllocator<FREE, TABLE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockAllocator")
            .field("whole", &self.whole)
            .field("free_list", &self.free_list)
            .field("usage", &self.usage())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: u64, length: u64) -> Segment {
        Segment::new(BlockAddress::new(start), length)
    }

    fn free_of<const F: usize, const T: usize>(a: &BlockAllocator<F, T>) -> Vec<(u64, u64)> {
        a.free_segments()
            .map(|s| (s.start().as_u64(), s.length()))
            .collect()
    }

    #[test]
    fn split_keeps_free_entry_in_place() {
        let mut a = BlockAllocator::<4, 4>::new(seg(0, 100));
        let head = a.free_list().head();

        assert_eq!(a.alloc(30), Ok(BlockAddress::new(0)));
        assert_eq!(a.free_list().head(), head);
        assert_eq!(a.free_list().segment(head), seg(30, 70));
        assert_eq!(a.allocations().collect::<Vec<_>>(), vec![seg(0, 30)]);
    }

    #[test]
    fn zero_sized_request_is_rejected() {
        let mut a = BlockAllocator::<4, 4>::new(seg(0, 100));
        assert_eq!(a.alloc(0), Err(AllocError::ZeroSized));
        assert_eq!(a.usage().allocations, 0);
    }

    #[test]
    fn sole_free_segment_is_never_handed_out_whole() {
        let mut a = BlockAllocator::<4, 4>::new(seg(0, 16));
        assert_eq!(a.largest_available(), 15);
        assert_eq!(
            a.alloc(16),
            Err(AllocError::OutOfMemory {
                requested: 16,
                largest_available: 15
            })
        );
        assert_eq!(a.alloc(15), Ok(BlockAddress::new(0)));
        assert_eq!(free_of(&a), vec![(15, 1)]);
    }

    #[test]
    fn table_capacity_is_checked_before_searching() {
        let mut a = BlockAllocator::<4, 1>::new(seg(0, 100));
        a.alloc(1).unwrap();
        assert_eq!(
            a.alloc(1),
            Err(AllocError::CapacityExceeded {
                table: Table::Allocations,
                capacity: 1
            })
        );
        assert_eq!(free_of(&a), vec![(1, 99)]);
    }

    #[test]
    fn free_merges_with_lower_neighbor_only() {
        let mut a = BlockAllocator::<4, 4>::new(seg(0, 100));
        let x = a.alloc(10).unwrap();
        let y = a.alloc(10).unwrap();
        let _z = a.alloc(10).unwrap();

        a.free(x).unwrap();
        assert_eq!(free_of(&a), vec![(0, 10), (30, 70)]);
        a.free(y).unwrap();
        assert_eq!(free_of(&a), vec![(0, 20), (30, 70)]);
        assert!(a.is_consistent());
    }

    #[test]
    fn free_merges_with_upper_neighbor_only() {
        let mut a = BlockAllocator::<4, 4>::new(seg(0, 100));
        let _x = a.alloc(10).unwrap();
        let y = a.alloc(10).unwrap();

        a.free(y).unwrap();
        assert_eq!(free_of(&a), vec![(10, 90)]);
    }

    #[test]
    fn free_without_neighbors_needs_a_free_list_slot() {
        let mut a = BlockAllocator::<2, 8>::new(seg(0, 100));
        let x = a.alloc(10).unwrap();
        let _ = a.alloc(10).unwrap();
        let z = a.alloc(10).unwrap();
        let _ = a.alloc(10).unwrap();

        a.free(x).unwrap();
        assert_eq!(
            a.free(z),
            Err(AllocError::CapacityExceeded {
                table: Table::FreeList,
                capacity: 2
            })
        );
        // The failed free left the allocation outstanding.
        assert_eq!(a.allocation_table().get(z), Some(seg(20, 10)));
        assert!(a.is_consistent());
    }

    #[test]
    fn usage_accounts_for_every_block() {
        let mut a = BlockAllocator::<4, 4>::new(seg(100, 50));
        a.alloc(5).unwrap();
        let b = a.alloc(7).unwrap();
        a.alloc(3).unwrap();
        a.free(b).unwrap();

        let usage = a.usage();
        assert_eq!(usage.allocated_blocks, 8);
        assert_eq!(usage.free_blocks, 42);
        assert_eq!(usage.free_segments, 2);
        assert_eq!(usage.allocations, 2);
        assert_eq!(usage.largest_free, 35);
    }
}
