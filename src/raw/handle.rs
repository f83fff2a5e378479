use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Address of a node slot in the arena.
///
/// Nodes never own each other through handles: a parent lists its children by handle and
/// each child names its parent the same way, so splits and merges can walk upward from a
/// leaf without keeping a path. The root is the only node with no parent, which makes a
/// parent link an `Option<Handle>`. Storing `index + 1` in a `NonZero` lets that option
/// use the zero niche and stay the size of a bare handle.
///
/// The width is `u16` under test so the capacity limit is reachable in a unit test, and
/// `u32` otherwise.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// The largest slot index a handle can address.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        let raw = (index + 1) as RawHandle;
        match NonZero::new(raw) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    /// Returns the arena slot index this handle addresses.
    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Parent links are `Option<Handle>`; they must stay as small as a bare handle.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn index_past_max_panics() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }

    #[test]
    fn first_and_last_slots() {
        assert_eq!(Handle::from_index(0).to_index(), 0);
        assert_eq!(Handle::from_index(Handle::MAX).to_index(), Handle::MAX);
    }

    proptest! {
        #[test]
        fn distinct_indices_give_distinct_handles(a in 0..=Handle::MAX, b in 0..=Handle::MAX) {
            prop_assert_eq!(Handle::from_index(a) == Handle::from_index(b), a == b);
            prop_assert_eq!(Handle::from_index(a).to_index(), a);
        }
    }
}
