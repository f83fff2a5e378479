use core::borrow::Borrow;
use core::fmt;

use crate::Order;
use crate::error::Result;
use crate::raw::RawBTree;

mod diagnostics;

pub use diagnostics::Dump;

/// An ordered map based on a classic [B-Tree] of caller-chosen order.
///
/// The order is the maximum number of children of an internal node, so every node holds
/// at most `order - 1` keys and every node except the root at least `(order - 1) / 2`.
/// Unlike a B+tree, internal nodes hold real entries: a lookup can end above the leaves,
/// and removing an internal key pulls its in-order predecessor up from a leaf.
///
/// Keys must implement [`Ord`]. It is a logic error for a key to be modified in such a way
/// that its ordering relative to any other key changes while it is in the index.
///
/// Inserting a key that is already present does not replace the existing entry: the new
/// entry is stored directly after the old one, and lookups keep returning the old one.
/// Such an index stores duplicates but no longer satisfies the strict key ordering that
/// [`validate`](BTreeIndex::validate) checks, so callers wanting map semantics should test
/// with [`contains_key`](BTreeIndex::contains_key) or update through
/// [`get_mut`](BTreeIndex::get_mut).
///
/// [B-Tree]: https://en.wikipedia.org/wiki/B-tree
///
/// # Examples
///
/// ```
/// use ordbtree::BTreeIndex;
///
/// let mut ratings = BTreeIndex::new(5).unwrap();
///
/// ratings.insert("Alien", 8);
/// ratings.insert("Brazil", 9);
/// ratings.insert("Contact", 7);
///
/// assert_eq!(ratings.get(&"Brazil"), Some(&9));
/// assert_eq!(ratings.len(), 3);
///
/// if let Some(rating) = ratings.get_mut(&"Contact") {
///     *rating += 1;
/// }
/// assert_eq!(ratings.remove(&"Contact"), Some(8));
/// assert!(!ratings.delete(&"Dune"));
/// ```
#[derive(Clone)]
pub struct BTreeIndex<K, V> {
    raw: RawBTree<K, V>,
}

impl<K, V> BTreeIndex<K, V> {
    /// Makes a new, empty index of the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`](crate::Error::InvalidOrder) when `order < 3`; no
    /// index is built in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::{BTreeIndex, Error};
    ///
    /// let index: BTreeIndex<u32, &str> = BTreeIndex::new(4).unwrap();
    /// assert!(index.is_empty());
    ///
    /// let error = BTreeIndex::<u32, &str>::new(2).unwrap_err();
    /// assert_eq!(error, Error::InvalidOrder { order: 2 });
    /// ```
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::with_order(Order::new(order)?))
    }

    /// Makes a new, empty index from an already validated [`Order`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::{BTreeIndex, Order};
    ///
    /// let order = Order::new(8).unwrap();
    /// let index: BTreeIndex<i64, i64> = BTreeIndex::with_order(order);
    /// assert_eq!(index.order(), order);
    /// ```
    #[must_use]
    pub fn with_order(order: Order) -> Self {
        BTreeIndex {
            raw: RawBTree::new(order),
        }
    }

    /// Returns the order the index was built with.
    #[must_use]
    pub fn order(&self) -> Order {
        self.raw.order()
    }

    /// Returns the number of entries in the index.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(3).unwrap();
    /// assert_eq!(index.len(), 0);
    /// index.insert(1, "a");
    /// assert_eq!(index.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the index contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every entry, leaving a single empty root leaf. The order is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(3).unwrap();
    /// for key in 0..100 {
    ///     index.insert(key, ());
    /// }
    /// index.clear();
    /// assert!(index.is_empty());
    /// assert_eq!(index.height(), 1);
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord, V> BTreeIndex<K, V> {
    /// Inserts a key-value pair into the index.
    ///
    /// The entry goes into the leaf that owns the key. A leaf that overflows splits around
    /// its median key, which moves up into the parent; the split repeats upward for as long
    /// as parents overflow, and a split of the root adds a new root above it.
    ///
    /// An equal key already in the index is left in place and the new entry is stored after
    /// it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(4).unwrap();
    /// for key in 1..=4 {
    ///     index.insert(key, key * key);
    /// }
    /// // The fourth key overflowed the root leaf and split it.
    /// assert_eq!(index.height(), 2);
    /// assert_eq!(index.get(&3), Some(&9));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(order * log(n))
    pub fn insert(&mut self, key: K, value: V) {
        self.raw.insert(key, value);
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the index's key type, but the ordering on the
    /// borrowed form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(3).unwrap();
    /// index.insert(String::from("ant"), 6);
    /// assert_eq!(index.get("ant"), Some(&6));
    /// assert_eq!(index.get("bee"), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log(order) * log(n))
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(3).unwrap();
    /// index.insert(1, "a");
    /// if let Some(value) = index.get_mut(&1) {
    ///     *value = "b";
    /// }
    /// assert_eq!(index.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns the stored key and its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(3).unwrap();
    /// index.insert(1, "a");
    /// assert_eq!(index.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(index.get_key_value(&2), None);
    /// ```
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_key_value(key)
    }

    /// Returns `true` if the index contains an entry for the key.
    ///
    /// A lookup never changes the index.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(3).unwrap();
    /// index.insert(1, "a");
    /// assert!(index.contains_key(&1));
    /// assert!(!index.contains_key(&2));
    /// ```
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Removes a key from the index, returning its value if the key was present.
    ///
    /// A key held by an internal node is replaced by its in-order predecessor, the largest
    /// key of the subtree to its left. Whichever leaf lost an entry is then repaired bottom
    /// up: a node that falls under the minimum borrows a key through the parent from a
    /// sibling with one to spare (left first, then right), and otherwise merges with a
    /// sibling (left when there is one), which can leave the parent short in turn. A root
    /// left without keys hands over to its only child.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(3).unwrap();
    /// index.insert(1, "a");
    /// assert_eq!(index.remove(&1), Some("a"));
    /// assert_eq!(index.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(order * log(n))
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the index, returning the stored key and value if the key was
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(3).unwrap();
    /// index.insert(1, "a");
    /// assert_eq!(index.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(index.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key)
    }

    /// Deletes a key, reporting whether it was found. A missing key leaves the index
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordbtree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(4).unwrap();
    /// for key in [10, 20, 30, 40, 50] {
    ///     index.insert(key, ());
    /// }
    /// assert!(index.delete(&30));
    /// assert!(!index.delete(&30));
    /// assert_eq!(index.collect_keys(), [&10, &20, &40, &50]);
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key).is_some()
    }
}

impl<K, V> Default for BTreeIndex<K, V> {
    /// Creates an empty index of [`Order::DEFAULT`].
    fn default() -> Self {
        Self::with_order(Order::DEFAULT)
    }
}

impl<K: Ord, V> Extend<(K, V)> for BTreeIndex<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> fmt::Debug for BTreeIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTreeIndex")
            .field("order", &self.raw.order().get())
            .field("len", &self.raw.len())
            .field("height", &self.raw.height())
            .field("nodes", &self.raw.node_count())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn borrowed_lookups() {
        let mut index: BTreeIndex<String, u8> = BTreeIndex::new(3).unwrap();
        index.insert(String::from("a"), 1);
        assert_eq!(index.get("a"), Some(&1));
        assert!(index.delete("a"));
        assert!(!index.contains_key("a"));
    }

    #[test]
    fn debug_prints_a_summary() {
        let mut index = BTreeIndex::new(4).unwrap();
        index.extend((1..=4).map(|key| (key, ())));
        assert_eq!(
            format!("{index:?}"),
            "BTreeIndex { order: 4, len: 4, height: 2, nodes: 3 }"
        );
    }

    #[test]
    fn default_uses_order_three() {
        let index: BTreeIndex<u8, u8> = BTreeIndex::default();
        assert_eq!(index.order().get(), 3);
    }
}
