//! Error types for ordbtree.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur when building or checking a B-tree index.
///
/// A key that is absent is never an error: lookups and removals report misses through
/// `Option` or `bool` return values.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    /// The requested order cannot form a B-tree.
    #[error("invalid order {order}: a B-tree needs an order of at least {minimum}", minimum = crate::Order::MIN)]
    InvalidOrder { order: usize },

    /// An invariant check found a broken tree. This always indicates a defect in the tree
    /// implementation, never a condition the caller is expected to recover from.
    #[error("structural violation: {0}")]
    StructuralViolation(#[from] Violation),
}

/// The specific structural invariant reported by [`BTreeIndex::validate`](crate::BTreeIndex::validate).
///
/// Depths are counted from the root, which is at depth 0.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Violation {
    /// The root carries a parent link.
    #[error("root node has a parent")]
    RootHasParent,

    /// A child names some node other than the one listing it as its parent.
    #[error("node at depth {depth} does not point back at its parent")]
    ParentMismatch { depth: usize },

    /// A node holds more than `order - 1` keys.
    #[error("node at depth {depth} holds {count} keys (max {max})")]
    TooManyKeys { depth: usize, count: usize, max: usize },

    /// A node other than the root holds fewer than the minimum.
    #[error("node at depth {depth} holds {count} keys (min {min})")]
    TooFewKeys { depth: usize, count: usize, min: usize },

    /// An internal node does not have exactly one more child than keys.
    #[error("internal node at depth {depth} has {keys} keys but {children} children")]
    ChildCount { depth: usize, keys: usize, children: usize },

    /// A node stores a different number of values than keys.
    #[error("values out of step with keys at depth {depth}: {keys} keys, {values} values")]
    ValueCount { depth: usize, keys: usize, values: usize },

    /// Two adjacent keys in one node are equal or descending.
    #[error("keys not strictly increasing at depth {depth}, index {index}")]
    KeysOutOfOrder { depth: usize, index: usize },

    /// A key lies outside the range its parent's separators allow for its subtree.
    #[error("key at depth {depth}, index {index} falls outside its parent's separators")]
    SeparatorRange { depth: usize, index: usize },

    /// Leaves sit at different depths.
    #[error("leaf at depth {actual}, expected every leaf at depth {expected}")]
    UnevenLeafDepth { expected: usize, actual: usize },

    /// The stored length disagrees with the number of keys in the nodes.
    #[error("tree records {recorded} keys but holds {actual}")]
    KeyCountMismatch { recorded: usize, actual: usize },

    /// Live nodes exist that no path from the root reaches.
    #[error("arena holds {live} nodes but only {reachable} are reachable from the root")]
    OrphanedNodes { live: usize, reachable: usize },
}
