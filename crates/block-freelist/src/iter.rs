use crate::{FreeList, Segment, SlotIndex};
use core::iter::FusedIterator;

/// Segments of a [`FreeList`] in ascending address order.
#[derive(Clone)]
pub struct Iter<'a, const N: usize> {
    entries: Entries<'a, N>,
}

impl<'a, const N: usize> Iter<'a, N> {
    pub(crate) const fn new(list: &'a FreeList<N>) -> Self {
        Self {
            entries: Entries::new(list),
        }
    }
}

impl<const N: usize> Iterator for Iter<'_, N> {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(_, segment)| segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<const N: usize> ExactSizeIterator for Iter<'_, N> {}
impl<const N: usize> FusedIterator for Iter<'_, N> {}

/// Slots and segments of a [`FreeList`] in ascending address order.
///
/// The yielded [`SlotIndex`] values are only valid while the list is
/// borrowed by this iterator.
#[derive(Clone)]
pub struct Entries<'a, const N: usize> {
    list: &'a FreeList<N>,
    slot: SlotIndex,
    remaining: usize,
}

impl<'a, const N: usize> Entries<'a, N> {
    pub(crate) const fn new(list: &'a FreeList<N>) -> Self {
        Self {
            list,
            slot: list.head(),
            remaining: list.len(),
        }
    }
}

impl<const N: usize> Iterator for Entries<'_, N> {
    type Item = (SlotIndex, Segment);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let slot = self.slot;
        self.slot = self.list.next(slot);
        Some((slot, self.list.segment(slot)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<const N: usize> ExactSizeIterator for Entries<'_, N> {}
impl<const N: usize> FusedIterator for Entries<'_, N> {}
