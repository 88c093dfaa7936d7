use super::btree_traits::BTreeParams;
use crate::key_compare::KeyComparator;

/// B-tree node: sorted keys, and `keys.len() + 1` children unless it is a leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BTreeNode<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<Box<BTreeNode<K>>>,
    pub(crate) leaf: bool,
}

impl<K> BTreeNode<K> {
    /// Empty node with room for a full complement of keys and children.
    pub(crate) fn new<T: BTreeParams<KeyType = K>>(leaf: bool) -> Self {
        Self {
            keys: Vec::with_capacity(T::MAX_KEYS),
            children: if leaf {
                Vec::new()
            } else {
                Vec::with_capacity(T::MAX_CHILDREN)
            },
            leaf,
        }
    }

    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub fn children(&self) -> impl ExactSizeIterator<Item = &BTreeNode<K>> + '_ {
        self.children.iter().map(|c| &**c)
    }

    #[inline]
    pub fn child(&self, slot: usize) -> Option<&BTreeNode<K>> {
        self.children.get(slot).map(|c| &**c)
    }

    #[inline]
    pub fn num_keys(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    #[inline]
    pub(crate) fn is_full<T: BTreeParams>(&self) -> bool {
        self.keys.len() >= T::MAX_KEYS
    }

    /// Has fewer than `t` keys, so it cannot give one up without underflowing.
    #[inline]
    pub(crate) fn is_few<T: BTreeParams>(&self) -> bool {
        self.keys.len() < T::MIN_DEGREE
    }

    /// Slot of the first key not less than `key`, by linear scan.
    pub(crate) fn find_lower<C: KeyComparator<K>>(&self, cmp: &C, key: &K) -> usize {
        let mut lo = 0;
        while lo < self.keys.len() && cmp.less(&self.keys[lo], key) {
            lo += 1;
        }
        lo
    }

    /// Rightmost key of the subtree.
    pub(crate) fn max_key(&self) -> &K {
        let mut curr = self;
        while let Some(last) = curr.children.last() {
            curr = &**last;
        }
        &curr.keys[curr.keys.len() - 1]
    }

    /// Leftmost key of the subtree.
    pub(crate) fn min_key(&self) -> &K {
        let mut curr = self;
        while let Some(first) = curr.children.first() {
            curr = &**first;
        }
        &curr.keys[0]
    }

    /// Number of keys in the subtree.
    pub fn subtree_len(&self) -> usize {
        self.keys.len() + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }

    /// Number of nodes in the subtree.
    pub fn subtree_nodes(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.subtree_nodes())
            .sum::<usize>()
    }
}
