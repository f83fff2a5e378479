use alloc::vec::Vec;
use core::fmt;

use super::BTreeIndex;
use crate::error::Result;
use crate::raw::RawBTree;

impl<K, V> BTreeIndex<K, V> {
    /// Returns the number of levels from the root to the leaves. Every leaf sits at the
    /// same depth, and an empty index has height 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(4).unwrap();
    /// assert_eq!(index.height(), 1);
    /// for key in 1..=10 {
    ///     index.insert(key, ());
    /// }
    /// assert_eq!(index.height(), 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log(n))
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the fewest keys a node other than the root may hold.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let index: BTreeIndex<u8, ()> = BTreeIndex::new(6).unwrap();
    /// assert_eq!((index.min_keys(), index.max_keys()), (2, 5));
    /// ```
    #[must_use]
    pub fn min_keys(&self) -> usize {
        self.raw.order().min_keys()
    }

    /// Returns the most keys any node may hold.
    #[must_use]
    pub fn max_keys(&self) -> usize {
        self.raw.order().max_keys()
    }

    /// Returns the number of nodes currently making up the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.raw.node_count()
    }

    /// Returns the mean number of keys per node, a rough measure of how full the tree is.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(4).unwrap();
    /// for key in 1..=4 {
    ///     index.insert(key, ());
    /// }
    /// // [2] over [1] and [3, 4].
    /// assert_eq!(index.node_count(), 3);
    /// assert!((index.average_keys_per_node() - 4.0 / 3.0).abs() < f64::EPSILON);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_keys_per_node(&self) -> f64 {
        self.raw.len() as f64 / self.raw.node_count() as f64
    }

    /// Returns every key in ascending order.
    ///
    /// This walks the whole tree and is meant for inspection and testing rather than as an
    /// iteration API.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(3).unwrap();
    /// for key in [5, 1, 4, 2, 3] {
    ///     index.insert(key, ());
    /// }
    /// assert_eq!(index.collect_keys(), [&1, &2, &3, &4, &5]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn collect_keys(&self) -> Vec<&K> {
        self.raw.collect_keys()
    }

    /// Returns a [`Display`](fmt::Display) view of the tree's node structure.
    ///
    /// The output starts with the order, followed by one line per node in depth-first
    /// order, indented two spaces per level. The format is meant for debugging and may
    /// change.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(4).unwrap();
    /// for key in 1..=4 {
    ///     index.insert(key, ());
    /// }
    /// assert_eq!(index.dump().to_string(), "order 4\n[2]\n  [1]\n  [3, 4]\n");
    /// ```
    #[must_use]
    pub fn dump(&self) -> Dump<'_, K, V> {
        Dump { raw: &self.raw }
    }
}

impl<K: Ord, V> BTreeIndex<K, V> {
    /// Checks every structural invariant of the tree.
    ///
    /// The checks cover key bounds per node, strictly increasing keys, separator ranges,
    /// child counts, equal leaf depth, parent links and the stored entry count. A correct
    /// index holding unique keys always passes; holding duplicate keys fails the ordering
    /// check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralViolation`](crate::Error::StructuralViolation) describing
    /// the first broken invariant found.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(3).unwrap();
    /// for key in 0..1000 {
    ///     index.insert(key, ());
    /// }
    /// for key in (0..1000).step_by(3) {
    ///     index.delete(&key);
    /// }
    /// assert!(index.validate().is_ok());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn validate(&self) -> Result<()> {
        Ok(self.raw.validate()?)
    }
}

/// A structural dump of a [`BTreeIndex`].
///
/// This `struct` is created by the [`dump`](BTreeIndex::dump) method.
pub struct Dump<'a, K, V> {
    raw: &'a RawBTree<K, V>,
}

impl<K: fmt::Debug, V> fmt::Display for Dump<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt_structure(f)
    }
}
