use super::RawBTree;
use crate::error::Violation;
use crate::raw::handle::Handle;

/// Running totals gathered while walking the tree.
#[derive(Default)]
struct Audit {
    leaf_depth: Option<usize>,
    keys: usize,
    nodes: usize,
}

impl<K: Ord, V> RawBTree<K, V> {
    /// Checks every structural invariant and reports the first one found broken.
    pub(crate) fn validate(&self) -> Result<(), Violation> {
        if !self.nodes.get(self.root).is_root() {
            return Err(Violation::RootHasParent);
        }

        let mut audit = Audit::default();
        self.validate_node(self.root, 0, None, None, &mut audit)?;

        if audit.keys != self.len {
            return Err(Violation::KeyCountMismatch {
                recorded: self.len,
                actual: audit.keys,
            });
        }
        if audit.nodes != self.nodes.len() {
            return Err(Violation::OrphanedNodes {
                live: self.nodes.len(),
                reachable: audit.nodes,
            });
        }
        Ok(())
    }

    /// Validates the subtree under `handle`, whose keys must fall strictly between
    /// `lower` and `upper` when those are given.
    fn validate_node<'a>(
        &'a self,
        handle: Handle,
        depth: usize,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        audit: &mut Audit,
    ) -> Result<(), Violation> {
        let node = self.nodes.get(handle);
        let count = node.key_count();
        audit.nodes += 1;
        audit.keys += count;

        if node.value_count() != count {
            return Err(Violation::ValueCount {
                depth,
                keys: count,
                values: node.value_count(),
            });
        }
        if count > self.order.max_keys() {
            return Err(Violation::TooManyKeys {
                depth,
                count,
                max: self.order.max_keys(),
            });
        }
        if !node.is_root() && count < self.order.min_keys() {
            return Err(Violation::TooFewKeys {
                depth,
                count,
                min: self.order.min_keys(),
            });
        }

        for (index, key) in node.keys().iter().enumerate() {
            if index > 0 && node.key(index - 1) >= key {
                return Err(Violation::KeysOutOfOrder { depth, index });
            }
            if lower.is_some_and(|bound| key <= bound) || upper.is_some_and(|bound| key >= bound) {
                return Err(Violation::SeparatorRange { depth, index });
            }
        }

        if node.is_leaf() {
            match audit.leaf_depth {
                None => audit.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(Violation::UnevenLeafDepth { expected, actual: depth });
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.child_count() != count + 1 {
            return Err(Violation::ChildCount {
                depth,
                keys: count,
                children: node.child_count(),
            });
        }

        for (index, &child) in node.children().iter().enumerate() {
            if self.nodes.get(child).parent() != Some(handle) {
                return Err(Violation::ParentMismatch { depth: depth + 1 });
            }
            let lower = if index == 0 { lower } else { Some(node.key(index - 1)) };
            let upper = if index == count { upper } else { Some(node.key(index)) };
            self.validate_node(child, depth + 1, lower, upper, audit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Order;

    fn filled(order: usize, keys: core::ops::Range<i32>) -> RawBTree<i32, ()> {
        let mut tree = RawBTree::new(Order::new(order).unwrap());
        for key in keys {
            tree.insert(key, ());
        }
        tree
    }

    #[test]
    fn healthy_tree_passes() {
        assert_eq!(filled(5, 0..200).validate(), Ok(()));
    }

    #[test]
    fn drifted_key_count_is_reported() {
        let mut tree = filled(4, 0..20);
        tree.len += 1;
        assert_eq!(
            tree.validate(),
            Err(Violation::KeyCountMismatch {
                recorded: 21,
                actual: 20
            })
        );
    }

    #[test]
    fn duplicates_break_strict_ordering() {
        let mut tree = filled(5, 0..3);
        tree.insert(1, ());
        assert_eq!(tree.validate(), Err(Violation::KeysOutOfOrder { depth: 0, index: 2 }));
    }

    #[test]
    fn stale_parent_link_is_reported() {
        let mut tree = filled(3, 0..10);
        let root = tree.root();
        let child = tree.node(root).child(0);
        tree.nodes.get_mut(child).set_parent(Some(child));
        assert_eq!(tree.validate(), Err(Violation::ParentMismatch { depth: 1 }));
    }

    #[test]
    fn underfull_node_is_reported() {
        let mut tree = filled(5, 0..20);
        let root = tree.root();
        let first = tree.node(root).child(0);
        while tree.nodes.get_mut(first).pop_last_entry().is_some() {
            tree.len -= 1;
        }
        assert_eq!(
            tree.validate(),
            Err(Violation::TooFewKeys {
                depth: 1,
                count: 0,
                min: 2
            })
        );
    }
}
