//! Search-tree engine: an unbalanced binary search tree, an AVL tree and a B-tree.
//!
//! Every tree exposes its root so callers can walk the current shape after each mutation.
//! Mutations never fail; duplicate inserts and removals of absent keys are reported through
//! return values and leave the tree as it was.

pub mod binary_base;
pub mod btree_base;
pub mod errors;
pub mod key_compare;
pub mod logging;

pub use binary_base::{
    avl::{AvlStats, AvlTree, Rebalance},
    bst::BinarySearchTree,
    node::BinaryNode,
};
pub use btree_base::{
    btree::BTree,
    deletion::{RemovalFlags, RemovalResult},
    node::BTreeNode,
    BTreeWithDegree, DefaultBTree, VerifiedBTree,
};
pub use errors::InvariantViolation;
pub use key_compare::{DefaultKeyComparator, KeyComparator};
