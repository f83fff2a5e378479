use core::borrow::Borrow;
use core::fmt;

use alloc::vec::Vec;

use crate::btree_index::Dump;
use crate::error::Result;
use crate::{BTreeIndex, Order};

/// An ordered set based on a B-Tree of caller-chosen order.
///
/// This is a [`BTreeIndex`] without values; see its documentation for how the tree is
/// shaped and rebalanced. Values are stored as `()`, which takes no space in the nodes.
///
/// # Examples
///
/// ```
/// use ordbtree::BTreeIndexSet;
///
/// let mut primes = BTreeIndexSet::new(3).unwrap();
/// for p in [2, 3, 5, 7, 11, 13] {
///     primes.insert(p);
/// }
///
/// assert!(primes.contains(&7));
/// assert!(!primes.contains(&9));
///
/// assert!(primes.remove(&2));
/// assert_eq!(primes.collect_keys(), [&3, &5, &7, &11, &13]);
/// ```
#[derive(Clone)]
pub struct BTreeIndexSet<T> {
    map: BTreeIndex<T, ()>,
}

impl<T> BTreeIndexSet<T> {
    /// Makes a new, empty set of the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`](crate::Error::InvalidOrder) when `order < 3`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndexSet;
    ///
    /// let set: BTreeIndexSet<i32> = BTreeIndexSet::new(6).unwrap();
    /// assert!(set.is_empty());
    /// assert!(BTreeIndexSet::<i32>::new(1).is_err());
    /// ```
    pub fn new(order: usize) -> Result<Self> {
        Ok(BTreeIndexSet {
            map: BTreeIndex::new(order)?,
        })
    }

    /// Makes a new, empty set from an already validated [`Order`].
    #[must_use]
    pub fn with_order(order: Order) -> Self {
        BTreeIndexSet {
            map: BTreeIndex::with_order(order),
        }
    }

    /// Returns the order the set was built with.
    #[must_use]
    pub fn order(&self) -> Order {
        self.map.order()
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the number of levels from the root to the leaves.
    #[must_use]
    pub fn height(&self) -> usize {
        self.map.height()
    }

    /// Returns the number of nodes currently making up the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.map.node_count()
    }

    /// Returns the mean number of elements per node.
    #[must_use]
    pub fn average_keys_per_node(&self) -> f64 {
        self.map.average_keys_per_node()
    }

    /// Returns every element in ascending order.
    #[must_use]
    pub fn collect_keys(&self) -> Vec<&T> {
        self.map.collect_keys()
    }

    /// Returns a [`Display`](fmt::Display) view of the tree's node structure.
    #[must_use]
    pub fn dump(&self) -> Dump<'_, T, ()> {
        self.map.dump()
    }
}

impl<T: Ord> BTreeIndexSet<T> {
    /// Adds a value to the set. An equal value already present is kept and the new one is
    /// stored after it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndexSet;
    ///
    /// let mut set = BTreeIndexSet::new(3).unwrap();
    /// set.insert(2);
    /// assert!(set.contains(&2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) {
        self.map.insert(value, ());
    }

    /// Returns `true` if the set contains an element equal to the value.
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the stored element equal to the value, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndexSet;
    ///
    /// let mut set = BTreeIndexSet::new(3).unwrap();
    /// set.insert(String::from("kiwi"));
    /// assert_eq!(set.get("kiwi").map(String::as_str), Some("kiwi"));
    /// assert_eq!(set.get("fig"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.get_key_value(value).map(|(key, ())| key)
    }

    /// Removes an element equal to the value, reporting whether one was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndexSet;
    ///
    /// let mut set = BTreeIndexSet::new(3).unwrap();
    /// set.insert(2);
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.delete(value)
    }

    /// Removes and returns the stored element equal to the value, if any.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.remove_entry(value).map(|(key, ())| key)
    }

    /// Checks every structural invariant of the tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralViolation`](crate::Error::StructuralViolation) describing
    /// the first broken invariant found.
    pub fn validate(&self) -> Result<()> {
        self.map.validate()
    }
}

impl<T> Default for BTreeIndexSet<T> {
    /// Creates an empty set of [`Order::DEFAULT`].
    fn default() -> Self {
        Self::with_order(Order::DEFAULT)
    }
}

impl<T: Ord> Extend<T> for BTreeIndexSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> fmt::Debug for BTreeIndexSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTreeIndexSet")
            .field("order", &self.map.order().get())
            .field("len", &self.map.len())
            .field("height", &self.map.height())
            .field("nodes", &self.map.node_count())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;
    use pretty_assertions::assert_eq;

    #[test]
    fn take_returns_the_stored_element() {
        let mut set = BTreeIndexSet::new(3).unwrap();
        set.extend([3, 1, 2]);
        assert_eq!(set.take(&2), Some(2));
        assert_eq!(set.take(&2), None);
        assert_eq!(set.collect_keys(), [&1, &3]);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut set = BTreeIndexSet::new(4).unwrap();
        set.insert(7);
        set.insert(7);
        assert_eq!(set.len(), 2);
        assert!(set.remove(&7));
        assert!(set.contains(&7));
        assert!(set.remove(&7));
        assert!(set.is_empty());
    }

    #[test]
    fn debug_prints_a_summary() {
        let mut set = BTreeIndexSet::new(3).unwrap();
        set.extend(0..3);
        assert_eq!(
            format!("{set:?}"),
            "BTreeIndexSet { order: 3, len: 3, height: 2, nodes: 3 }"
        );
    }

    #[test]
    fn clear_keeps_the_order() {
        let mut set = BTreeIndexSet::with_order(Order::new(7).unwrap());
        set.extend(0..50);
        set.clear();
        assert_eq!(set.order().get(), 7);
        assert_eq!(set.height(), 1);
        assert_eq!(set.node_count(), 1);
    }
}
