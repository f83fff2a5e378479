use core::borrow::Borrow;
use core::fmt;

use alloc::vec::Vec;
use log::{debug, trace};

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;
use crate::Order;

mod rebalance;
mod validate;

/// The core B-tree implementation backing `BTreeIndex`.
#[derive(Clone)]
pub(crate) struct RawBTree<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node. A tree always has a root, possibly an empty leaf.
    root: Handle,
    order: Order,
    /// Total number of keys stored across all nodes.
    len: usize,
}

impl<K, V> RawBTree<K, V> {
    /// Creates a tree consisting of one empty root leaf.
    pub(crate) fn new(order: Order) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new(None));
        Self {
            nodes,
            root,
            order,
            len: 0,
        }
    }

    pub(crate) const fn order(&self) -> Order {
        self.order
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of live nodes.
    pub(crate) const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of levels from the root down to the leaves.
    ///
    /// All leaves share one depth, so following the first child is enough.
    pub(crate) fn height(&self) -> usize {
        let mut levels = 1;
        let mut current = self.nodes.get(self.root);
        while let Some(&first) = current.children().first() {
            levels += 1;
            current = self.nodes.get(first);
        }
        levels
    }

    /// Drops every node and starts over from a single empty root leaf.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(Node::new(None));
        self.len = 0;
        debug!("tree cleared");
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Handle {
        self.root
    }

    #[cfg(test)]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    /// Returns every key in sorted order by walking the tree in order.
    pub(crate) fn collect_keys(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_subtree(self.root, &mut out);
        out
    }

    fn collect_subtree<'a>(&'a self, handle: Handle, out: &mut Vec<&'a K>) {
        let node = self.nodes.get(handle);
        if node.is_leaf() {
            out.extend(node.keys());
            return;
        }
        for (index, key) in node.keys().iter().enumerate() {
            self.collect_subtree(node.child(index), out);
            out.push(key);
        }
        self.collect_subtree(node.child(node.key_count()), out);
    }

    /// Writes one line per node, indented two spaces per level, in depth-first order.
    pub(crate) fn fmt_structure(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        K: fmt::Debug,
    {
        writeln!(f, "order {}", self.order.get())?;
        self.fmt_subtree(f, self.root, 0)
    }

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, handle: Handle, depth: usize) -> fmt::Result
    where
        K: fmt::Debug,
    {
        let node = self.nodes.get(handle);
        writeln!(f, "{:indent$}{:?}", "", node.keys(), indent = depth * 2)?;
        for &child in node.children() {
            self.fmt_subtree(f, child, depth + 1)?;
        }
        Ok(())
    }

    /// Points every child of `handle` back at `handle`.
    fn adopt_children(&mut self, handle: Handle) {
        for index in 0..self.nodes.get(handle).child_count() {
            let child = self.nodes.get(handle).child(index);
            self.nodes.get_mut(child).set_parent(Some(handle));
        }
    }

    /// Hangs the current root under a new, keyless root and returns the new root.
    fn grow_root(&mut self) -> Handle {
        let old_root = self.root;
        let new_root = self.nodes.alloc(Node::with_first_child(old_root));
        self.nodes.get_mut(old_root).set_parent(Some(new_root));
        self.root = new_root;
        debug!("root split, height now {}", self.height());
        new_root
    }
}

impl<K: Ord, V> RawBTree<K, V> {
    /// Searches for a key and returns the handle and index of the node holding it.
    ///
    /// Internal nodes carry keys too, so the search may stop above the leaves.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<(Handle, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            if let Some(index) = node.locate_index(key) {
                return Some((current, index));
            }
            if node.is_leaf() {
                return None;
            }
            current = node.child(node.right_index(key));
        }
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, index) = self.search(key)?;
        Some(self.nodes.get(handle).value(index))
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, index) = self.search(key)?;
        Some(self.nodes.get_mut(handle).value_mut(index))
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, index) = self.search(key)?;
        let node = self.nodes.get(handle);
        Some((node.key(index), node.value(index)))
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Follows `right_index` from the root down to the leaf that owns `key`.
    pub(crate) fn descend_to_leaf<Q>(&self, key: &Q) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                return current;
            }
            current = node.child(node.right_index(key));
        }
    }

    /// Inserts a key-value pair. An equal key already present is kept, and the new entry
    /// is placed after it.
    pub(crate) fn insert(&mut self, key: K, value: V) {
        let leaf = self.descend_to_leaf(&key);
        self.len += 1;
        self.add_key_to_node(leaf, key, value, None);
    }

    /// Adds an entry to `target` and splits upward for as long as nodes overflow.
    ///
    /// `promoted` is `(left, right)` when the entry is a median coming up from a split of
    /// `left`: the entry then goes at `left`'s position and `right` directly after it.
    fn add_key_to_node(&mut self, mut target: Handle, mut key: K, mut value: V, mut promoted: Option<(Handle, Handle)>) {
        loop {
            let node = self.nodes.get_mut(target);
            match promoted {
                None => {
                    let index = node.right_index(&key);
                    node.insert_entry(index, key, value);
                }
                Some((left, right)) => {
                    let index = node
                        .position_of(left)
                        .expect("`RawBTree::add_key_to_node()` - split node is not listed by its parent!");
                    node.insert_entry(index, key, value);
                    node.insert_child(index + 1, right);
                }
            }

            if node.key_count() <= self.order.max_keys() {
                return;
            }

            let parent = match node.parent() {
                Some(parent) => parent,
                None => self.grow_root(),
            };

            let median = self.order.median_index();
            let node = self.nodes.get_mut(target);
            let (median_key, median_value, sibling) = node.split_off(median);
            trace!(
                "split {} node at median {}: {} keys stay, {} move right",
                if sibling.is_leaf() { "leaf" } else { "internal" },
                median,
                node.key_count(),
                sibling.key_count()
            );

            let sibling = self.nodes.alloc(sibling);
            self.adopt_children(sibling);

            key = median_key;
            value = median_value;
            promoted = Some((target, sibling));
            target = parent;
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn tree(order: usize) -> RawBTree<i32, i32> {
        RawBTree::new(Order::new(order).unwrap())
    }

    fn root_keys(tree: &RawBTree<i32, i32>) -> Vec<i32> {
        tree.node(tree.root()).keys().to_vec()
    }

    #[test]
    fn new_tree_is_a_single_empty_leaf() {
        let tree = tree(3);
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.node(tree.root()).is_leaf());
        tree.validate().unwrap();
    }

    #[test]
    fn root_split_links_both_halves_to_the_new_root() {
        let mut tree = tree(4);
        for key in 1..=4 {
            tree.insert(key, key);
        }
        assert_eq!(root_keys(&tree), vec![2]);
        let root = tree.node(tree.root());
        for &child in root.children() {
            assert_eq!(tree.node(child).parent(), Some(tree.root()));
        }
        assert_eq!(tree.node(root.child(0)).keys(), &[1]);
        assert_eq!(tree.node(root.child(1)).keys(), &[3, 4]);
        tree.validate().unwrap();
    }

    #[test]
    fn cascading_split_reparents_moved_children() {
        let mut tree = tree(4);
        for key in 1..=10 {
            tree.insert(key, key);
        }
        assert_eq!(tree.height(), 3);
        assert_eq!(root_keys(&tree), vec![4]);

        // [6, 8] took over children [5], [7] and [9, 10] when [2, 4, 6, 8] split.
        let right = tree.node(tree.root()).child(1);
        assert_eq!(tree.node(right).keys(), &[6, 8]);
        for &child in tree.node(right).children() {
            assert_eq!(tree.node(child).parent(), Some(right));
        }
        tree.validate().unwrap();
    }

    #[test]
    fn search_stops_at_internal_keys() {
        let mut tree = tree(3);
        for key in [10, 20, 30] {
            tree.insert(key, key * 2);
        }
        // 10 | 20 | 30 under order 3: 20 was promoted into the root.
        assert_eq!(tree.search(&20), Some((tree.root(), 0)));
        assert_eq!(tree.get(&30), Some(&60));
        assert_eq!(tree.search(&25), None);
    }

    #[test]
    fn duplicate_insert_keeps_both_entries() {
        let mut tree = tree(5);
        tree.insert(7, 1);
        tree.insert(7, 2);
        assert_eq!(tree.len(), 2);
        assert_eq!(root_keys(&tree), vec![7, 7]);
        // The first copy wins lookups, the second sits after it.
        assert_eq!(tree.get(&7), Some(&1));
        assert_eq!(*tree.node(tree.root()).value(1), 2);
    }

    #[test]
    fn removing_an_internal_key_takes_its_predecessor() {
        let mut tree = tree(4);
        for key in 1..=10 {
            tree.insert(key, key * 10);
        }
        assert_eq!(tree.remove_entry(&4), Some((4, 40)));
        assert!(!root_keys(&tree).contains(&4));
        assert_eq!(tree.collect_keys(), [&1, &2, &3, &5, &6, &7, &8, &9, &10]);
        tree.validate().unwrap();
    }

    #[test]
    fn merges_shrink_the_tree_back_to_a_leaf() {
        let mut tree = tree(3);
        for key in 0..64 {
            tree.insert(key, key);
        }
        assert!(tree.height() > 1);
        for key in 0..64 {
            assert_eq!(tree.remove_entry(&key), Some((key, key)));
            tree.validate().unwrap();
        }
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.is_empty());
    }

    #[test]
    fn freed_nodes_are_reused() {
        let mut tree = tree(3);
        for key in 0..32 {
            tree.insert(key, key);
        }
        for key in 0..32 {
            tree.remove_entry(&key);
        }
        for key in 0..32 {
            tree.insert(key, key);
        }
        tree.validate().unwrap();
        assert_eq!(tree.len(), 32);
    }

    #[test]
    fn clear_resets_to_an_empty_leaf() {
        let mut tree = tree(3);
        for key in 0..20 {
            tree.insert(key, key);
        }
        tree.clear();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        tree.validate().unwrap();
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..400).prop_map(Op::Insert),
            2 => (0i32..400).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn invariants_hold_after_every_operation(
            order in 3usize..9,
            ops in prop::collection::vec(op_strategy(), 0..400),
        ) {
            let mut tree = tree(order);
            let mut model: BTreeMap<i32, i32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        // Keys stay unique; duplicates are covered separately.
                        if !model.contains_key(&key) {
                            tree.insert(key, key * 2);
                            model.insert(key, key * 2);
                        }
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(tree.remove_entry(&key), model.remove_entry(&key));
                    }
                }
                prop_assert_eq!(tree.validate(), Ok(()));
                prop_assert_eq!(tree.len(), model.len());
            }

            let keys: Vec<i32> = tree.collect_keys().into_iter().copied().collect();
            let expected: Vec<i32> = model.keys().copied().collect();
            prop_assert_eq!(keys, expected);
        }
    }
}
