use std::fmt::Debug;
use std::marker::PhantomData;

use crate::key_compare::KeyComparator;

/// Shape parameters of a B-tree.
pub trait BTreeTraits: Clone + Debug {
    /// Minimum degree `t`; must be at least 2.
    const MIN_DEGREE: usize;
    /// Run `verify()` after every mutation and `debug_assert!` the outcome.
    const SELF_VERIFY: bool;
}

/// Traits selecting minimum degree `T`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinDegree<const T: usize>;

impl<const T: usize> BTreeTraits for MinDegree<T> {
    const MIN_DEGREE: usize = T;
    const SELF_VERIFY: bool = false;
}

/// Like [`MinDegree`], with invariant checking after every mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedMinDegree<const T: usize>;

impl<const T: usize> BTreeTraits for VerifiedMinDegree<T> {
    const MIN_DEGREE: usize = T;
    const SELF_VERIFY: bool = true;
}

/// 2-3-4 tree: one to three keys per node.
pub type DefaultBTreeTraits = MinDegree<2>;

pub trait BTreeParams: Clone + Debug {
    type KeyType: Clone + Debug;
    type KeyCompareType: KeyComparator<Self::KeyType>;
    type Traits: BTreeTraits;
    const MIN_DEGREE: usize;
    const MAX_KEYS: usize;
    const MIN_KEYS: usize;
    const MAX_CHILDREN: usize;
    const SELF_VERIFY: bool;
}

#[derive(Clone, Debug)]
pub struct _BTree<TKey: Clone + Debug, TCompare, Traits: BTreeTraits> {
    _phantom_key: PhantomData<TKey>,
    _phantom_compare: PhantomData<TCompare>,
    _phantom_traits: PhantomData<Traits>,
}

impl<TKey: Clone + Debug, TCompare: KeyComparator<TKey>, TTraits: BTreeTraits> BTreeParams
    for _BTree<TKey, TCompare, TTraits>
{
    type KeyType = TKey;
    type KeyCompareType = TCompare;
    type Traits = TTraits;
    const MIN_DEGREE: usize = TTraits::MIN_DEGREE;
    const MAX_KEYS: usize = 2 * TTraits::MIN_DEGREE - 1;
    const MIN_KEYS: usize = TTraits::MIN_DEGREE - 1;
    const MAX_CHILDREN: usize = 2 * TTraits::MIN_DEGREE;
    const SELF_VERIFY: bool = TTraits::SELF_VERIFY;
}

#[cfg(test)]
#[test]
fn test_btree_traits() {
    use crate::key_compare::DefaultKeyComparator;

    type Params = _BTree<i32, DefaultKeyComparator<i32>, DefaultBTreeTraits>;
    assert_eq!(Params::MIN_DEGREE, 2);
    assert_eq!(Params::MAX_KEYS, 3);
    assert_eq!(Params::MIN_KEYS, 1);
    assert_eq!(Params::MAX_CHILDREN, 4);
    assert!(!Params::SELF_VERIFY);

    type Wide = _BTree<i32, DefaultKeyComparator<i32>, VerifiedMinDegree<5>>;
    assert_eq!(Wide::MAX_KEYS, 9);
    assert_eq!(Wide::MIN_KEYS, 4);
    assert!(Wide::SELF_VERIFY);
}
