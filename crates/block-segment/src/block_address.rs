use core::fmt;
use core::ops::{Add, AddAssign};

/// The address of a single block in the managed address space.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BlockAddress(u64);

impl BlockAddress {
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Advance by `blocks`, returning `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, blocks: u64) -> Option<Self> {
        match self.0.checked_add(blocks) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Debug for BlockAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockAddress({})", self.0)
    }
}

impl fmt::Display for BlockAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add<u64> for BlockAddress {
    type Output = Self;
    #[inline]
    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl AddAssign<u64> for BlockAddress {
    #[inline]
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}

impl From<u64> for BlockAddress {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<BlockAddress> for u64 {
    #[inline]
    fn from(value: BlockAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_advances_by_blocks() {
        let mut a = BlockAddress::new(10);
        assert_eq!(a + 5, BlockAddress::new(15));
        a += 7;
        assert_eq!(a.as_u64(), 17);
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(BlockAddress::new(u64::MAX).checked_add(1), None);
        assert_eq!(
            BlockAddress::new(1).checked_add(2),
            Some(BlockAddress::new(3))
        );
    }

    #[test]
    fn formatting() {
        let a = BlockAddress::new(42);
        assert_eq!(format!("{a}"), "42");
        assert_eq!(format!("{a:?}"), "BlockAddress(42)");
    }
}
