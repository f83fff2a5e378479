use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::Handle;

// Inline capacity before a node's storage spills to the heap. Kept small under test so
// the spilled representation gets exercised by ordinary order-4 and order-5 trees.
#[cfg(test)]
pub(crate) const INLINE_KEYS: usize = 4;
#[cfg(not(test))]
pub(crate) const INLINE_KEYS: usize = 16;

/// A B-tree node. Leaves and internal nodes share one shape: a node is a leaf exactly when
/// it has no children.
///
/// An overflowing node briefly holds `order` keys (and `order + 1` children) between the
/// insertion and the split that repairs it.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    // Non-owning back link; `None` only for the root.
    parent: Option<Handle>,
    keys: SmallVec<[K; INLINE_KEYS]>,
    // values[i] belongs to keys[i].
    values: SmallVec<[V; INLINE_KEYS]>,
    // Empty for leaves, keys.len() + 1 entries otherwise.
    children: SmallVec<[Handle; INLINE_KEYS + 1]>,
}

impl<K, V> Node<K, V> {
    /// Creates an empty leaf hanging off `parent`.
    pub(crate) fn new(parent: Option<Handle>) -> Self {
        Self {
            parent,
            keys: SmallVec::new(),
            values: SmallVec::new(),
            children: SmallVec::new(),
        }
    }

    /// Creates a node with a single child and no keys yet: the shape of a fresh root
    /// just before it absorbs a promoted median.
    pub(crate) fn with_first_child(child: Handle) -> Self {
        let mut node = Self::new(None);
        node.children.push(child);
        node
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn value_count(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn value(&self, index: usize) -> &V {
        &self.values[index]
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, index: usize) -> &mut V {
        &mut self.values[index]
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    pub(crate) fn last_child(&self) -> Option<Handle> {
        self.children.last().copied()
    }

    /// Returns the position of `child` among this node's children.
    pub(crate) fn position_of(&self, child: Handle) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Returns the index of the first key equal to `key`.
    #[inline]
    pub(crate) fn locate_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let index = self.keys.partition_point(|k| k.borrow() < key);
        (index < self.keys.len() && self.keys[index].borrow() == key).then_some(index)
    }

    /// Returns the number of keys not greater than `key`.
    ///
    /// For a key absent from this node that is the child to descend into. As an insertion
    /// position it places a duplicate after every equal key already present.
    #[inline]
    pub(crate) fn right_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.keys.partition_point(|k| k.borrow() <= key)
    }

    pub(crate) fn insert_entry(&mut self, index: usize, key: K, value: V) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    pub(crate) fn insert_child(&mut self, index: usize, child: Handle) {
        self.children.insert(index, child);
    }

    pub(crate) fn remove_entry(&mut self, index: usize) -> (K, V) {
        let key = self.keys.remove(index);
        let value = self.values.remove(index);
        (key, value)
    }

    pub(crate) fn remove_child(&mut self, index: usize) -> Handle {
        self.children.remove(index)
    }

    /// Overwrites the entry at `index`, returning the previous one.
    pub(crate) fn replace_entry(&mut self, index: usize, key: K, value: V) -> (K, V) {
        let key = core::mem::replace(&mut self.keys[index], key);
        let value = core::mem::replace(&mut self.values[index], value);
        (key, value)
    }

    pub(crate) fn push_entry(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    pub(crate) fn push_child(&mut self, child: Handle) {
        self.children.push(child);
    }

    pub(crate) fn pop_last_entry(&mut self) -> Option<(K, V)> {
        let key = self.keys.pop()?;
        let value = self.values.pop().expect("`Node::pop_last_entry()` - values out of step with keys!");
        Some((key, value))
    }

    pub(crate) fn pop_first_entry(&mut self) -> Option<(K, V)> {
        if self.keys.is_empty() {
            None
        } else {
            Some(self.remove_entry(0))
        }
    }

    pub(crate) fn pop_last_child(&mut self) -> Option<Handle> {
        self.children.pop()
    }

    pub(crate) fn pop_first_child(&mut self) -> Option<Handle> {
        if self.children.is_empty() {
            None
        } else {
            Some(self.children.remove(0))
        }
    }

    /// Splits an overflowing node around `median`.
    ///
    /// Entries and children strictly right of the median move to the returned sibling,
    /// which shares this node's parent; the median entry itself is returned for promotion.
    /// The moved children still point at this node and must be re-parented by the caller.
    pub(crate) fn split_off(&mut self, median: usize) -> (K, V, Node<K, V>) {
        let mut right = Node::new(self.parent);
        right.keys = self.keys.drain(median + 1..).collect();
        right.values = self.values.drain(median + 1..).collect();
        if !self.is_leaf() {
            right.children = self.children.drain(median + 1..).collect();
        }

        let (key, value) = self.pop_last_entry().expect("`Node::split_off()` - `median` out of range!");
        (key, value, right)
    }

    /// Absorbs the separator entry and then everything in `right`.
    ///
    /// `right`'s children still point at `right` and must be re-parented by the caller.
    pub(crate) fn merge_with_right(&mut self, separator: (K, V), mut right: Node<K, V>) {
        self.push_entry(separator.0, separator.1);
        self.keys.append(&mut right.keys);
        self.values.append(&mut right.values);
        self.children.append(&mut right.children);
    }
}
