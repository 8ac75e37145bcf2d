use crate::iter::{Entries, Iter};
use block_segment::Segment;
use core::fmt;
use log::trace;

/// Position of an entry in the backing array of a [`FreeList`].
///
/// Only valid until the next mutating call on the list; see the crate
/// documentation on slot relocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SlotIndex(usize);

impl SlotIndex {
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An occupied slot: the free segment and the slot of its successor.
#[derive(Copy, Clone)]
struct Link {
    segment: Segment,
    next: SlotIndex,
}

/// Address-sorted circular list of free segments backed by `N` fixed slots.
///
/// The list is never empty: it starts out with the whole managed range and
/// refuses to remove its last entry.
pub struct FreeList<const N: usize> {
    /// Slot storage. `None` marks a vacant slot.
    links: [Option<Link>; N],
    /// Number of occupied slots.
    len: usize,
    /// Slot holding the lowest-address segment.
    head: SlotIndex,
}

impl<const N: usize> FreeList<N> {
    /// Create a list whose only entry is `segment`.
    #[must_use]
    pub const fn new(segment: Segment) -> Self {
        const { assert!(N > 0, "a free list needs at least one slot") };

        let mut links = [None; N];
        links[0] = Some(Link {
            segment,
            next: SlotIndex(0),
        });
        Self {
            links,
            len: 1,
            head: SlotIndex(0),
        }
    }

    /// Number of entries. Never zero.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.len
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

    /// Slot of the lowest-address entry.
    #[inline]
    #[must_use]
    pub const fn head(&self) -> SlotIndex {
        self.head
    }

    /// Slot of the entry following `slot` in address order.
    ///
    /// The highest entry is followed by the head.
    ///
    /// # Panics
    /// Panics if `slot` is vacant.
    #[inline]
    #[must_use]
    pub fn next(&self, slot: SlotIndex) -> SlotIndex {
        self.link(slot).next
    }

    /// Segment stored at `slot`.
    ///
    /// # Panics
    /// Panics if `slot` is vacant.
    #[inline]
    #[must_use]
    pub fn segment(&self, slot: SlotIndex) -> Segment {
        self.link(slot).segment
    }

    /// Mutable access to the segment stored at `slot`.
    ///
    /// The caller must leave the list sorted and free of overlaps. An entry
    /// may temporarily become contiguous with its successor, provided it is
    /// folded in with [`merge_with_next`](Self::merge_with_next) right after.
    ///
    /// # Panics
    /// Panics if `slot` is vacant.
    #[inline]
    pub fn segment_mut(&mut self, slot: SlotIndex) -> &mut Segment {
        &mut self.link_mut(slot).segment
    }

    /// Segments in ascending address order, starting at the head.
    #[inline]
    #[must_use]
    pub const fn iter(&self) -> Iter<'_, N> {
        Iter::new(self)
    }

    /// Slots and segments in ascending address order, starting at the head.
    #[inline]
    #[must_use]
    pub const fn entries(&self) -> Entries<'_, N> {
        Entries::new(self)
    }

    /// Insert `segment` at its address-ordered position.
    ///
    /// Returns the slot now holding `segment`. When `segment` becomes the new
    /// minimum it takes over the head slot and the previous minimum moves to
    /// a freshly claimed slot.
    ///
    /// The segment must not overlap any entry. Coalescing with neighbors is
    /// the caller's business.
    ///
    /// # Errors
    /// [`FreeListError::CapacityExceeded`] if all `N` slots are occupied.
    pub fn insert(&mut self, segment: Segment) -> Result<SlotIndex, FreeListError> {
        let Some(vacant) = self.vacant_slot() else {
            return Err(FreeListError::CapacityExceeded { capacity: N });
        };
        debug_assert!(
            !self.iter().any(|s| s.overlaps(segment)),
            "inserted segment {segment} overlaps a free segment"
        );

        let head = self.head;
        let first = *self.link(head);

        if segment.start() < first.segment.start() {
            // Our predecessor would be the highest entry, which still points
            // at the head slot. Keep that link valid by moving the old minimum
            // out of the head slot instead of searching for the predecessor.
            self.links[vacant.0] = Some(first);
            self.links[head.0] = Some(Link {
                segment,
                next: vacant,
            });
            self.len += 1;
            trace!(
                "free list: {segment} is the new minimum, relocated {} from slot {head} to {vacant}",
                first.segment
            );
            self.debug_check();
            return Ok(head);
        }

        let mut prev = head;
        loop {
            let next = self.next(prev);
            // Reaching the head again means we are the new maximum.
            if next == head || segment.start() < self.segment(next).start() {
                self.links[vacant.0] = Some(Link { segment, next });
                self.link_mut(prev).next = vacant;
                self.len += 1;
                trace!("free list: inserted {segment} at slot {vacant} after slot {prev}");
                self.debug_check();
                return Ok(vacant);
            }
            prev = next;
        }
    }

    /// Detach the entry at `slot` and return its segment.
    ///
    /// The successor's payload moves into `slot` and the successor's slot is
    /// released, so no predecessor lookup is needed. Any other slot index
    /// obtained before this call must be considered stale.
    ///
    /// # Panics
    /// Panics if `slot` is vacant or holds the only remaining entry.
    pub fn remove(&mut self, slot: SlotIndex) -> Segment {
        assert!(self.len > 1, "the last free segment cannot be removed");

        let removed = *self.link(slot);
        let successor = removed.next;
        let moved = *self.link(successor);

        self.links[slot.0] = Some(moved);
        self.links[successor.0] = None;
        if successor == self.head {
            // We removed the maximum; the minimum now lives in `slot`.
            self.head = slot;
        }
        self.len -= 1;

        trace!(
            "free list: removed {} from slot {slot}, relocated {} from slot {successor}",
            removed.segment, moved.segment
        );
        self.debug_check();
        removed.segment
    }

    /// Fold the successor of `slot` into the entry at `slot`.
    ///
    /// Both entries must be contiguous. The merged segment stays at `slot`;
    /// the successor's slot is released. Returns the merged segment.
    ///
    /// # Panics
    /// Panics if `slot` is vacant, is the highest entry, or is not contiguous
    /// with its successor.
    pub fn merge_with_next(&mut self, slot: SlotIndex) -> Segment {
        let link = *self.link(slot);
        let successor = link.next;
        assert!(
            successor != self.head,
            "the highest free segment has no successor to merge with"
        );

        let absorbed = *self.link(successor);
        let merged = link.segment.merge(absorbed.segment);
        self.links[slot.0] = Some(Link {
            segment: merged,
            next: absorbed.next,
        });
        self.links[successor.0] = None;
        self.len -= 1;

        trace!(
            "free list: merged {} at slot {slot} with {} from slot {successor}",
            link.segment, absorbed.segment
        );
        self.debug_check();
        merged
    }

    /// Check every structural invariant of the list.
    ///
    /// The list must be non-empty, the occupancy count must match `len`,
    /// following `next` from the head must visit `len` distinct occupied
    /// slots in strictly ascending, non-overlapping, non-contiguous order and
    /// then return to the head.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let occupied = self.links.iter().filter(|l| l.is_some()).count();
        if self.len == 0 || occupied != self.len {
            return false;
        }

        let mut visited = [false; N];
        let mut slot = self.head;
        let mut previous: Option<Segment> = None;
        for _ in 0..self.len {
            let Some(Some(link)) = self.links.get(slot.0) else {
                return false;
            };
            if visited[slot.0] {
                return false;
            }
            visited[slot.0] = true;

            if let Some(prev) = previous
                && (link.segment.start() <= prev.start()
                    || prev.overlaps(link.segment)
                    || prev.is_contiguous_with(link.segment))
            {
                return false;
            }
            previous = Some(link.segment);
            slot = link.next;
        }

        slot == self.head
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.is_well_formed(), "free list invariants violated");
    }

    fn vacant_slot(&self) -> Option<SlotIndex> {
        self.links.iter().position(Option::is_none).map(SlotIndex)
    }

    fn link(&self, slot: SlotIndex) -> &Link {
        match self.links.get(slot.0) {
            Some(Some(link)) => link,
            _ => panic!("free list slot {slot} holds no entry"),
        }
    }

    fn link_mut(&mut self, slot: SlotIndex) -> &mut Link {
        match self.links.get_mut(slot.0) {
            Some(Some(link)) => link,
            _ => panic!("free list slot {slot} holds no entry"),
        }
    }
}

impl<'a, const N: usize> IntoIterator for &'a FreeList<N> {
    type Item = Segment;
    type IntoIter = Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<const N: usize> fmt::Debug for FreeList<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeList")
            .field("len", &self.len)
            .field("capacity", &N)
            .field("head", &self.head)
            .field("segments", &DebugSegments(self))
            .finish()
    }
}

struct DebugSegments<'a, const N: usize>(&'a FreeList<N>);

impl<const N: usize> fmt::Debug for DebugSegments<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FreeListError {
    #[error("free list is full ({capacity} entries)")]
    CapacityExceeded { capacity: usize },
}
