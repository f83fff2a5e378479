//! Order-parameterized in-memory B-tree index for Rust.
//!
//! This crate provides [`BTreeIndex`] and [`BTreeIndexSet`], classic B-trees whose
//! order (the maximum number of children per internal node) is chosen at construction
//! time rather than fixed at compile time:
//!
//! - Keys live in every node, internal nodes included, so a search may stop above the leaves
//! - Insertion splits overflowing nodes and promotes the median key, growing a new root when needed
//! - Deletion substitutes the in-order predecessor for internal keys and repairs underflow by
//!   borrowing from a sibling or merging with one, shrinking the root when it empties
//!
//! # Example
//!
//! ```
//! use ordbtree::BTreeIndex;
//!
//! let mut index = BTreeIndex::new(4).unwrap();
//! for key in 1..=10 {
//!     index.insert(key, key * 100);
//! }
//!
//! assert_eq!(index.get(&7), Some(&700));
//! assert_eq!(index.height(), 3);
//!
//! assert!(index.delete(&7));
//! assert!(!index.contains_key(&7));
//! assert!(index.validate().is_ok());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Runtime order** - Any order of 3 or more, validated once through [`Order`]
//! - **Arena storage** - Nodes are addressed by compact handles, parents by back-handles
//! - **Self-checking** - [`BTreeIndex::validate`] reports the first broken structural invariant
//!
//! # Implementation
//!
//! Nodes are stored in a slot arena and linked by handles in both directions: each node
//! lists its children, and each child names its parent. The parent link is what lets
//! splits and merges walk upward from a leaf without an explicit path stack.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order;
mod raw;

pub mod btree_index;
pub mod btree_index_set;

pub use btree_index::BTreeIndex;
pub use btree_index_set::BTreeIndexSet;
pub use error::{Error, Result, Violation};
pub use order::Order;
