use core::borrow::Borrow;

use log::{debug, trace};

use super::RawBTree;
use crate::raw::handle::Handle;

impl<K: Ord, V> RawBTree<K, V> {
    /// Removes a key from the tree and returns the stored key-value pair.
    ///
    /// A key held by an internal node is overwritten by its in-order predecessor, which is
    /// then removed from its leaf instead. Rebalancing always starts at a leaf.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (holder, index) = self.search(key)?;

        let (entry, leaf) = if self.nodes.get(holder).is_leaf() {
            (self.nodes.get_mut(holder).remove_entry(index), holder)
        } else {
            let leaf = self.rightmost_leaf(self.nodes.get(holder).child(index));
            let (key, value) = self
                .nodes
                .get_mut(leaf)
                .pop_last_entry()
                .expect("`RawBTree::remove_entry()` - predecessor leaf is empty!");
            (self.nodes.get_mut(holder).replace_entry(index, key, value), leaf)
        };

        self.len -= 1;
        self.rebalance(leaf);
        Some(entry)
    }

    /// Returns the leaf holding the largest key of the subtree under `handle`.
    fn rightmost_leaf(&self, mut handle: Handle) -> Handle {
        while let Some(last) = self.nodes.get(handle).last_child() {
            handle = last;
        }
        handle
    }

    /// Resolves underflow from `handle` upward: borrow left, borrow right, else merge and
    /// retry at the parent.
    fn rebalance(&mut self, mut handle: Handle) {
        let min = self.order.min_keys();

        loop {
            let node = self.nodes.get(handle);
            let Some(parent) = node.parent() else {
                self.collapse_root();
                return;
            };
            if node.key_count() >= min {
                return;
            }

            let parent_node = self.nodes.get(parent);
            let position = parent_node
                .position_of(handle)
                .expect("`RawBTree::rebalance()` - node is not listed by its parent!");
            let left = position.checked_sub(1).map(|index| parent_node.child(index));
            let right = (position + 1 < parent_node.child_count()).then(|| parent_node.child(position + 1));

            if let Some(left) = left
                && self.nodes.get(left).key_count() > min
            {
                self.borrow_from_left(parent, position);
                return;
            }

            if let Some(right) = right
                && self.nodes.get(right).key_count() > min
            {
                self.borrow_from_right(parent, position);
                return;
            }

            let separator = if left.is_some() { position - 1 } else { position };
            self.merge_children(parent, separator);
            handle = parent;
        }
    }

    /// Rotates through the separator left of `parent.children[position]`: the separator
    /// moves down to the front of the node and the left sibling's last key replaces it.
    fn borrow_from_left(&mut self, parent: Handle, position: usize) {
        let left = self.nodes.get(parent).child(position - 1);
        let handle = self.nodes.get(parent).child(position);

        let left_node = self.nodes.get_mut(left);
        let (key, value) = left_node
            .pop_last_entry()
            .expect("`RawBTree::borrow_from_left()` - left sibling has no key to lend!");
        let moved = left_node.pop_last_child();

        let (separator_key, separator_value) = self.nodes.get_mut(parent).replace_entry(position - 1, key, value);

        let node = self.nodes.get_mut(handle);
        node.insert_entry(0, separator_key, separator_value);
        if let Some(child) = moved {
            node.insert_child(0, child);
            self.nodes.get_mut(child).set_parent(Some(handle));
        }
        trace!("borrowed one key from the left sibling");
    }

    /// Mirror image of [`Self::borrow_from_left`] using the right sibling's first key.
    fn borrow_from_right(&mut self, parent: Handle, position: usize) {
        let right = self.nodes.get(parent).child(position + 1);
        let handle = self.nodes.get(parent).child(position);

        let right_node = self.nodes.get_mut(right);
        let (key, value) = right_node
            .pop_first_entry()
            .expect("`RawBTree::borrow_from_right()` - right sibling has no key to lend!");
        let moved = right_node.pop_first_child();

        let (separator_key, separator_value) = self.nodes.get_mut(parent).replace_entry(position, key, value);

        let node = self.nodes.get_mut(handle);
        node.push_entry(separator_key, separator_value);
        if let Some(child) = moved {
            node.push_child(child);
            self.nodes.get_mut(child).set_parent(Some(handle));
        }
        trace!("borrowed one key from the right sibling");
    }

    /// Merges `parent.children[separator + 1]` and the separator key into
    /// `parent.children[separator]`, freeing the right-hand node.
    fn merge_children(&mut self, parent: Handle, separator: usize) {
        let parent_node = self.nodes.get_mut(parent);
        let entry = parent_node.remove_entry(separator);
        let right = parent_node.remove_child(separator + 1);
        let left = parent_node.child(separator);

        let right_node = self.nodes.take(right);
        self.nodes.get_mut(left).merge_with_right(entry, right_node);
        self.adopt_children(left);
        trace!(
            "merged siblings around separator {separator}: survivor holds {} keys",
            self.nodes.get(left).key_count()
        );
    }

    /// Replaces a keyless internal root by its only child.
    fn collapse_root(&mut self) {
        let root = self.nodes.get(self.root);
        if root.key_count() > 0 || root.is_leaf() {
            return;
        }

        let child = root.child(0);
        self.nodes.free(self.root);
        self.nodes.get_mut(child).set_parent(None);
        self.root = child;
        debug!("root collapsed, height now {}", self.height());
    }
}
