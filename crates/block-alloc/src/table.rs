//! Fixed-capacity record of outstanding allocations.

use block_segment::{BlockAddress, Segment};
use core::iter::{Copied, Flatten};
use core::slice;

/// Index of a slot in an [`AllocationTable`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TableSlot(usize);

impl TableSlot {
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

/// Segments currently handed out to callers, one per slot.
///
/// Slots are claimed first-vacant-first. The table is independent from the
/// free list; the allocator keeps both in sync.
pub struct AllocationTable<const N: usize> {
    slots: [Option<Segment>; N],
    len: usize,
}

impl<const N: usize> AllocationTable<N> {
    #[must_use]
    pub const fn new() -> Self {
        const { assert!(N > 0, "an allocation table needs at least one slot") };
        Self {
            slots: [None; N],
            len: 0,
        }
    }

    /// Number of outstanding allocations.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// The slot whose allocation starts at `handle`.
    #[must_use]
    pub fn find(&self, handle: BlockAddress) -> Option<TableSlot> {
        self.slots
            .iter()
            .position(|s| s.is_some_and(|s| s.start() == handle))
            .map(TableSlot)
    }

    /// The allocation that starts at `handle`.
    #[must_use]
    pub fn get(&self, handle: BlockAddress) -> Option<Segment> {
        self.find(handle).and_then(|slot| self.slots[slot.0])
    }

    /// The allocation recorded in `slot`.
    ///
    /// # Panics
    /// Panics if the slot is vacant.
    #[must_use]
    pub fn segment(&self, slot: TableSlot) -> Segment {
        let Some(segment) = self.slots[slot.0] else {
            panic!("allocation table slot {} is not in use", slot.0);
        };
        segment
    }

    /// The first slot not holding an allocation.
    #[must_use]
    pub fn vacant(&self) -> Option<TableSlot> {
        self.slots.iter().position(Option::is_none).map(TableSlot)
    }

    /// Record `segment` in a slot obtained from [`vacant`](Self::vacant).
    ///
    /// # Panics
    /// Panics if the slot is already occupied.
    pub fn occupy(&mut self, slot: TableSlot, segment: Segment) {
        assert!(
            self.slots[slot.0].is_none(),
            "allocation table slot {} is already in use",
            slot.0
        );
        self.slots[slot.0] = Some(segment);
        self.len += 1;
    }

    /// Clear the slot and return the allocation it held.
    ///
    /// # Panics
    /// Panics if the slot is vacant.
    pub fn vacate(&mut self, slot: TableSlot) -> Segment {
        let Some(segment) = self.slots[slot.0].take() else {
            panic!("allocation table slot {} is not in use", slot.0);
        };
        self.len -= 1;
        segment
    }

    /// Outstanding allocations in slot order.
    pub fn iter(&self) -> Copied<Flatten<slice::Iter<'_, Option<Segment>>>> {
        self.slots.iter().flatten().copied()
    }

    /// Every slot in order, `None` for vacant ones.
    #[must_use]
    pub fn slots(&self) -> &[Option<Segment>] {
        &self.slots
    }
}

impl<const N: usize> Default for AllocationTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> IntoIterator for &'a AllocationTable<N> {
    type Item = Segment;
    type IntoIter = Copied<Flatten<slice::Iter<'a, Option<Segment>>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
