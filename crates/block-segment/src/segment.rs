use crate::BlockAddress;
use core::fmt;

/// A contiguous, half-open run of blocks `[start, start + length)`.
///
/// # Invariants
/// - `length > 0`.
/// - `start + length` does not overflow.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Segment {
    start: BlockAddress,
    length: u64,
}

impl Segment {
    /// Create a segment of `length` blocks starting at `start`.
    ///
    /// # Panics
    /// Panics if `length` is zero or if the segment would extend past the
    /// end of the address space.
    #[inline]
    #[must_use]
    pub const fn new(start: BlockAddress, length: u64) -> Self {
        match Self::try_new(start, length) {
            Some(segment) => segment,
            None => panic!("segment must be non-empty and within the address space"),
        }
    }

    /// Create a segment, returning `None` for zero-length or overflowing ranges.
    #[inline]
    #[must_use]
    pub const fn try_new(start: BlockAddress, length: u64) -> Option<Self> {
        if length == 0 || start.checked_add(length).is_none() {
            return None;
        }
        Some(Self { start, length })
    }

    #[inline]
    #[must_use]
    pub const fn start(self) -> BlockAddress {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn length(self) -> u64 {
        self.length
    }

    /// The first address past the segment.
    #[inline]
    #[must_use]
    pub const fn end(self) -> BlockAddress {
        BlockAddress::new(self.start.as_u64() + self.length)
    }

    /// Whether `addr` lies inside the segment.
    #[inline]
    #[must_use]
    pub const fn contains(self, addr: BlockAddress) -> bool {
        self.start.as_u64() <= addr.as_u64() && addr.as_u64() < self.end().as_u64()
    }

    /// Whether the two segments share at least one block.
    #[inline]
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.start.as_u64() < other.end().as_u64() && other.start.as_u64() < self.end().as_u64()
    }

    /// Whether one segment ends exactly where the other begins.
    ///
    /// Symmetric in its arguments.
    #[inline]
    #[must_use]
    pub const fn is_contiguous_with(self, other: Self) -> bool {
        let (lo, hi) = Self::ordered(self, other);
        lo.end().as_u64() == hi.start.as_u64()
    }

    /// Fuse two contiguous segments into the single segment spanning both.
    ///
    /// # Panics
    /// Panics if the segments are not contiguous.
    #[inline]
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        assert!(
            self.is_contiguous_with(other),
            "only contiguous segments can be merged"
        );
        let (lo, hi) = Self::ordered(self, other);
        Self {
            start: lo.start,
            length: lo.length + hi.length,
        }
    }

    /// Carve the first `size` blocks off this segment.
    ///
    /// Returns `[start, start + size)` and shrinks `self` in place to the
    /// remaining higher addresses. Consuming the whole segment is not a
    /// split; callers handle that case on their own.
    ///
    /// # Panics
    /// Panics unless `0 < size < self.length()`.
    #[inline]
    #[must_use]
    pub const fn extract_front(&mut self, size: u64) -> Self {
        assert!(size > 0, "cannot extract an empty segment");
        assert!(
            size < self.length,
            "extraction must leave a non-empty remainder"
        );
        let head = Self {
            start: self.start,
            length: size,
        };
        self.start = BlockAddress::new(self.start.as_u64() + size);
        self.length -= size;
        head
    }

    #[inline]
    const fn ordered(a: Self, b: Self) -> (Self, Self) {
        if a.start.as_u64() < b.start.as_u64() {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("start", &self.start.as_u64())
            .field("length", &self.length)
            .finish()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: u64, length: u64) -> Segment {
        Segment::new(BlockAddress::new(start), length)
    }

    #[test]
    fn end_is_exclusive() {
        let s = seg(10, 5);
        assert_eq!(s.end(), BlockAddress::new(15));
        assert!(s.contains(BlockAddress::new(14)));
        assert!(!s.contains(BlockAddress::new(15)));
        assert!(!s.contains(BlockAddress::new(9)));
    }

    #[test]
    fn try_new_rejects_empty_and_overflowing() {
        assert!(Segment::try_new(BlockAddress::new(0), 0).is_none());
        assert!(Segment::try_new(BlockAddress::new(u64::MAX), 1).is_none());
        assert!(Segment::try_new(BlockAddress::new(u64::MAX - 1), 1).is_some());
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn new_panics_on_zero_length() {
        let _ = seg(0, 0);
    }

    #[test]
    fn contiguity_is_symmetric() {
        let a = seg(0, 10);
        let b = seg(10, 20);
        assert!(a.is_contiguous_with(b));
        assert!(b.is_contiguous_with(a));

        let gap = seg(31, 1);
        assert!(!b.is_contiguous_with(gap));
        assert!(!gap.is_contiguous_with(b));
    }

    #[test]
    fn merge_takes_lower_start_regardless_of_order() {
        let a = seg(0, 10);
        let b = seg(10, 20);
        assert_eq!(a.merge(b), seg(0, 30));
        assert_eq!(b.merge(a), seg(0, 30));
    }

    #[test]
    #[should_panic(expected = "contiguous")]
    fn merge_panics_on_gap() {
        let _ = seg(0, 10).merge(seg(11, 1));
    }

    #[test]
    fn extract_front_keeps_higher_addresses() {
        let mut s = seg(100, 50);
        let head = s.extract_front(20);
        assert_eq!(head, seg(100, 20));
        assert_eq!(s, seg(120, 30));
        assert!(head.is_contiguous_with(s));
    }

    #[test]
    #[should_panic(expected = "non-empty remainder")]
    fn extract_front_refuses_whole_segment() {
        let mut s = seg(0, 8);
        let _ = s.extract_front(8);
    }

    #[test]
    fn overlap() {
        assert!(seg(0, 10).overlaps(seg(9, 1)));
        assert!(!seg(0, 10).overlaps(seg(10, 1)));
    }

    #[test]
    fn display_is_half_open() {
        assert_eq!(format!("{}", seg(0, 512)), "[0, 512)");
    }
}
