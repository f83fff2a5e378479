use crate::error::{Error, Result};

/// The order of a B-tree: the maximum number of children an internal node may have.
///
/// An `Order` is validated once, at construction, so every tree built from one is
/// guaranteed a usable shape. All capacity bounds of a tree derive from it:
///
/// | bound          | value                 |
/// |----------------|-----------------------|
/// | max children   | `order`               |
/// | max keys       | `order - 1`           |
/// | min keys       | `(order - 1) / 2`     |
/// | median index   | `(order - 1) / 2`     |
///
/// The minimum applies to every non-root node, leaf or internal alike. It equals the
/// number of keys left behind in an overflowing node after a split, which is what keeps
/// freshly split nodes legal. The textbook `order / 2` would not hold at even orders: an
/// order-4 node overflows at 4 keys and keeps only the single key left of the median, so
/// a minimum of 2 would make every fresh split underfull.
///
/// # Examples
///
/// ```
/// use ordbtree::Order;
///
/// let order = Order::new(5).unwrap();
/// assert_eq!(order.max_keys(), 4);
/// assert_eq!(order.min_keys(), 2);
///
/// assert!(Order::new(2).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Order(usize);

impl Order {
    /// The smallest order that forms a B-tree.
    pub const MIN: usize = 3;

    /// The order used by [`Default`]: a 2-3 tree.
    pub const DEFAULT: Self = Self(Self::MIN);

    /// Validates `order` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] when `order < 3`.
    pub const fn new(order: usize) -> Result<Self> {
        if order < Self::MIN {
            return Err(Error::InvalidOrder { order });
        }
        Ok(Self(order))
    }

    /// Returns the raw order value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns the maximum number of children of an internal node.
    #[must_use]
    pub const fn max_children(self) -> usize {
        self.0
    }

    /// Returns the maximum number of keys in any node.
    #[must_use]
    pub const fn max_keys(self) -> usize {
        self.0 - 1
    }

    /// Returns the minimum number of keys in any non-root node.
    #[must_use]
    pub const fn min_keys(self) -> usize {
        (self.0 - 1) / 2
    }

    /// Returns the index of the key promoted when a node overflows to `order` keys.
    #[must_use]
    pub const fn median_index(self) -> usize {
        (self.0 - 1) / 2
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for Order {
    type Error = Error;

    fn try_from(order: usize) -> Result<Self> {
        Self::new(order)
    }
}

impl From<Order> for usize {
    fn from(order: Order) -> Self {
        order.get()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn orders_below_three_are_rejected() {
        for order in 0..Order::MIN {
            assert_eq!(Order::new(order), Err(Error::InvalidOrder { order }));
        }
    }

    #[test]
    fn order_four_bounds() {
        let order = Order::new(4).unwrap();
        assert_eq!(order.max_children(), 4);
        assert_eq!(order.max_keys(), 3);
        assert_eq!(order.min_keys(), 1);
        assert_eq!(order.median_index(), 1);
    }

    #[test]
    fn even_order_split_leaves_exactly_the_minimum() {
        for raw in [4, 6, 8, 16] {
            let order = Order::new(raw).unwrap();
            assert_eq!(order.median_index(), order.min_keys());
            assert!(order.min_keys() < raw / 2, "order {raw}");
        }
    }

    #[test]
    fn default_is_a_two_three_tree() {
        let order = Order::default();
        assert_eq!(order.get(), 3);
        assert_eq!(order.min_keys(), 1);
    }

    proptest! {
        #[test]
        fn split_halves_are_never_underfull(raw in 3usize..512) {
            let order = Order::try_from(raw).unwrap();
            // An overflowing node holds `order` keys: left keeps median_index, right the rest.
            let left = order.median_index();
            let right = order.get() - order.median_index() - 1;
            prop_assert!(left >= order.min_keys());
            prop_assert!(right >= order.min_keys());
            prop_assert!(right <= order.max_keys());
        }

        #[test]
        fn merge_never_overflows(raw in 3usize..512) {
            let order = Order::new(raw).unwrap();
            // A deficient node, its separator and a sibling at minimum.
            let merged = (order.min_keys() - 1) + 1 + order.min_keys();
            prop_assert!(merged <= order.max_keys());
        }
    }
}
