use std::fmt::Debug;

use super::{
    iter::Iter,
    node::{height, min_value, print_node, verify_order, BinaryNode, Link},
};
use crate::{
    errors::{InvariantViolation, Result},
    key_compare::{DefaultKeyComparator, KeyComparator},
};

/// Counters of the restructurings performed since the tree was created or last cleared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AvlStats {
    pub size: usize,
    pub left_rotations: usize,
    pub right_rotations: usize,
}

impl AvlStats {
    pub fn rotations(&self) -> usize {
        self.left_rotations + self.right_rotations
    }
}

/// The four imbalance shapes, named after the path from the unbalanced node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rebalance {
    LeftLeft,
    LeftRight,
    RightRight,
    RightLeft,
}

/// Height-balanced binary search tree. Duplicate values are rejected.
#[derive(Clone)]
pub struct AvlTree<K, C = DefaultKeyComparator<K>> {
    root: Link<K>,
    stats: AvlStats,
    key_less: C,
}

impl<K, C> AvlTree<K, C> {
    pub fn clear(&mut self) {
        self.root = None;
        self.stats = AvlStats::default();
    }

    pub fn root(&self) -> Option<&BinaryNode<K>> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.stats.size
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn height(&self) -> usize {
        height(&self.root)
    }

    pub fn stats(&self) -> &AvlStats {
        &self.stats
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root())
    }
}

impl<K: Clone + Debug, C: KeyComparator<K>> Default for AvlTree<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotations
impl<K: Clone + Debug, C: KeyComparator<K>> AvlTree<K, C> {
    fn rotate_left(mut x: Box<BinaryNode<K>>, stats: &mut AvlStats) -> Box<BinaryNode<K>> {
        let mut y = match x.right.take() {
            Some(y) => y,
            None => unreachable!("left rotation at {:?} without a right child", x.value),
        };
        x.right = y.left.take();
        x.update_height();
        y.left = Some(x);
        y.update_height();
        stats.left_rotations += 1;
        y
    }

    fn rotate_right(mut y: Box<BinaryNode<K>>, stats: &mut AvlStats) -> Box<BinaryNode<K>> {
        let mut x = match y.left.take() {
            Some(x) => x,
            None => unreachable!("right rotation at {:?} without a left child", y.value),
        };
        y.left = x.right.take();
        y.update_height();
        x.right = Some(y);
        x.update_height();
        stats.right_rotations += 1;
        x
    }

    fn apply(
        mut node: Box<BinaryNode<K>>,
        case: Rebalance,
        stats: &mut AvlStats,
    ) -> Box<BinaryNode<K>> {
        log::debug!("AvlTree: {:?} rotation at {:?}", case, node.value);
        match case {
            Rebalance::LeftLeft => Self::rotate_right(node, stats),
            Rebalance::RightRight => Self::rotate_left(node, stats),
            Rebalance::LeftRight => {
                node.left = node.left.take().map(|left| Self::rotate_left(left, stats));
                Self::rotate_right(node, stats)
            }
            Rebalance::RightLeft => {
                node.right = node.right.take().map(|right| Self::rotate_right(right, stats));
                Self::rotate_left(node, stats)
            }
        }
    }
}

/// Insertion
impl<K: Clone + Debug, C: KeyComparator<K>> AvlTree<K, C> {
    pub fn new() -> Self {
        Self {
            root: None,
            stats: AvlStats::default(),
            key_less: C::new(),
        }
    }

    pub fn key_comp(&self) -> &C {
        &self.key_less
    }

    /// Insert `value`, rebalancing on the way back up. Returns false for a duplicate.
    pub fn insert(&mut self, value: K) -> bool {
        let mut inserted = false;
        let root = self.root.take();
        self.root = Some(Self::insert_descend(
            root,
            &value,
            &self.key_less,
            &mut self.stats,
            &mut inserted,
        ));
        if inserted {
            self.stats.size += 1;
        } else {
            log::debug!("AvlTree::insert: duplicate {:?} ignored", value);
        }
        inserted
    }

    fn insert_descend(
        node: Link<K>,
        value: &K,
        cmp: &C,
        stats: &mut AvlStats,
        inserted: &mut bool,
    ) -> Box<BinaryNode<K>> {
        let Some(mut node) = node else {
            *inserted = true;
            return Box::new(BinaryNode::new(value.clone()));
        };

        if cmp.less(value, &node.value) {
            node.left = Some(Self::insert_descend(
                node.left.take(),
                value,
                cmp,
                stats,
                inserted,
            ));
        } else if cmp.less(&node.value, value) {
            node.right = Some(Self::insert_descend(
                node.right.take(),
                value,
                cmp,
                stats,
                inserted,
            ));
        } else {
            return node;
        }

        node.update_height();
        let balance = node.balance_factor();

        // the new value sits below the heavy child, its side of that child picks the case
        let case = if balance > 1 {
            match node.left() {
                Some(left) if cmp.less(value, &left.value) => Some(Rebalance::LeftLeft),
                Some(_) => Some(Rebalance::LeftRight),
                None => None,
            }
        } else if balance < -1 {
            match node.right() {
                Some(right) if cmp.less(&right.value, value) => Some(Rebalance::RightRight),
                Some(_) => Some(Rebalance::RightLeft),
                None => None,
            }
        } else {
            None
        };

        match case {
            Some(case) => Self::apply(node, case, stats),
            None => node,
        }
    }
}

/// Removal
impl<K: Clone + Debug, C: KeyComparator<K>> AvlTree<K, C> {
    /// Remove `value`, rebalancing on the way back up. Returns false if it was absent.
    pub fn remove(&mut self, value: &K) -> bool {
        let mut removed = false;
        let root = self.root.take();
        self.root = Self::remove_descend(
            root,
            value,
            &self.key_less,
            &mut self.stats,
            &mut removed,
        );
        if removed {
            self.stats.size -= 1;
        } else {
            log::debug!("AvlTree::remove: {:?} not found", value);
        }
        removed
    }

    fn remove_descend(
        node: Link<K>,
        value: &K,
        cmp: &C,
        stats: &mut AvlStats,
        removed: &mut bool,
    ) -> Link<K> {
        let mut node = node?;

        if cmp.less(value, &node.value) {
            node.left = Self::remove_descend(node.left.take(), value, cmp, stats, removed);
        } else if cmp.less(&node.value, value) {
            node.right = Self::remove_descend(node.right.take(), value, cmp, stats, removed);
        } else {
            *removed = true;
            match (node.left.take(), node.right.take()) {
                (None, child) | (child, None) => return child,
                (left, Some(right)) => {
                    let successor = min_value(&*right).clone();
                    log::trace!(
                        "AvlTree::remove: {:?} replaced by successor {:?}",
                        node.value,
                        successor
                    );
                    node.left = left;
                    node.right = Self::remove_descend(Some(right), &successor, cmp, stats, removed);
                    node.value = successor;
                }
            }
        }

        node.update_height();
        let balance = node.balance_factor();

        // after a removal the heavy child's own balance decides between single and double
        let case = if balance > 1 {
            match node.left() {
                Some(left) if left.balance_factor() >= 0 => Some(Rebalance::LeftLeft),
                Some(_) => Some(Rebalance::LeftRight),
                None => None,
            }
        } else if balance < -1 {
            match node.right() {
                Some(right) if right.balance_factor() <= 0 => Some(Rebalance::RightRight),
                Some(_) => Some(Rebalance::RightLeft),
                None => None,
            }
        } else {
            None
        };

        Some(match case {
            Some(case) => Self::apply(node, case, stats),
            None => node,
        })
    }
}

/// Lookup and verification
impl<K: Clone + Debug, C: KeyComparator<K>> AvlTree<K, C> {
    pub fn find(&self, value: &K) -> Option<&BinaryNode<K>> {
        let mut curr = self.root();
        while let Some(node) = curr {
            if self.key_less.less(value, &node.value) {
                curr = node.left();
            } else if self.key_less.less(&node.value, value) {
                curr = node.right();
            } else {
                return Some(node);
            }
        }
        None
    }

    pub fn contains(&self, value: &K) -> bool {
        self.find(value).is_some()
    }

    /// Check strict ordering, stored heights, balance factors and the tracked size.
    pub fn verify(&self) -> Result<()> {
        let counted = match self.root() {
            Some(root) => {
                let counted = verify_order(root, false, &self.key_less)?;
                Self::verify_balance(root)?;
                counted
            }
            None => 0,
        };
        if counted != self.stats.size {
            return Err(InvariantViolation::SizeMismatch {
                tracked: self.stats.size,
                counted,
            });
        }
        Ok(())
    }

    fn verify_balance(node: &BinaryNode<K>) -> Result<usize> {
        let lh = node.left().map_or(Ok(0), Self::verify_balance)?;
        let rh = node.right().map_or(Ok(0), Self::verify_balance)?;
        let computed = 1 + lh.max(rh);
        if node.height != computed {
            return Err(InvariantViolation::HeightMismatch {
                key: format!("{:?}", node.value),
                stored: node.height,
                computed,
            });
        }
        let balance = lh as isize - rh as isize;
        if balance.abs() > 1 {
            return Err(InvariantViolation::Unbalanced {
                key: format!("{:?}", node.value),
                balance,
            });
        }
        Ok(computed)
    }
}

impl<K: Debug, C> Debug for AvlTree<K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.root() {
            Some(root) => print_node(f, root, true),
            None => writeln!(f, "(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tree: &AvlTree<i32>) -> Vec<i32> {
        tree.iter().copied().collect()
    }

    #[test]
    fn left_right_case_is_a_double_rotation() {
        let mut tree = AvlTree::<i32>::new();
        for v in [30, 10, 20] {
            assert!(tree.insert(v));
        }
        let root = tree.root().unwrap();
        assert_eq!(*root.value(), 20);
        assert_eq!(root.left().map(|n| *n.value()), Some(10));
        assert_eq!(root.right().map(|n| *n.value()), Some(30));
        assert_eq!(tree.stats().left_rotations, 1);
        assert_eq!(tree.stats().right_rotations, 1);
        tree.verify().unwrap();
    }

    #[test]
    fn right_left_case_is_a_double_rotation() {
        let mut tree = AvlTree::<i32>::new();
        for v in [10, 30, 20] {
            tree.insert(v);
        }
        assert_eq!(tree.root().map(|n| *n.value()), Some(20));
        assert_eq!(tree.stats().rotations(), 2);
        tree.verify().unwrap();
    }

    #[test]
    fn removal_uses_child_balance_for_the_case() {
        // removing 40 leaves 20 with balance 0 under a left-heavy root: single right rotation
        let mut tree = AvlTree::<i32>::new();
        for v in [30, 20, 40, 10, 25] {
            tree.insert(v);
        }
        let before = tree.stats().clone();
        assert!(tree.remove(&40));
        assert_eq!(tree.stats().right_rotations, before.right_rotations + 1);
        assert_eq!(tree.stats().left_rotations, before.left_rotations);
        assert_eq!(tree.root().map(|n| *n.value()), Some(20));
        assert_eq!(values(&tree), vec![10, 20, 25, 30]);
        tree.verify().unwrap();
    }

    #[test]
    fn removing_a_two_child_node_promotes_successor() {
        let mut tree = AvlTree::<i32>::new();
        for v in [20, 10, 30, 25, 35] {
            tree.insert(v);
        }
        assert!(tree.remove(&20));
        assert_eq!(tree.root().map(|n| *n.value()), Some(25));
        assert_eq!(values(&tree), vec![10, 25, 30, 35]);
        tree.verify().unwrap();
    }
}
