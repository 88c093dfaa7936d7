pub mod btree;
pub mod btree_traits;
pub mod deletion;
pub mod iter;
pub mod node;
pub mod tree_stats;

use self::{
    btree::BTree,
    btree_traits::{DefaultBTreeTraits, MinDegree, VerifiedMinDegree, _BTree},
};
use crate::key_compare::DefaultKeyComparator;

pub type DefaultBTreeConfig<K> = _BTree<K, DefaultKeyComparator<K>, DefaultBTreeTraits>;
pub type DefaultBTree<K> = BTree<DefaultBTreeConfig<K>>;

pub type BTreeConfig<K, const T: usize> = _BTree<K, DefaultKeyComparator<K>, MinDegree<T>>;
pub type BTreeWithDegree<K, const T: usize> = BTree<BTreeConfig<K, T>>;

/// Configuration that re-verifies every invariant after each mutation.
pub type VerifiedBTreeConfig<K, const T: usize> =
    _BTree<K, DefaultKeyComparator<K>, VerifiedMinDegree<T>>;
pub type VerifiedBTree<K, const T: usize> = BTree<VerifiedBTreeConfig<K, T>>;
