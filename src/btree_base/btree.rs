use super::{
    btree_traits::BTreeParams,
    deletion::{RemovalFlags, RemovalResult},
    iter::BTreeIterator,
    node::BTreeNode,
    tree_stats::TreeStats,
};
use crate::{
    errors::{InvariantViolation, Result},
    key_compare::KeyComparator,
};

type Key<T> = <T as BTreeParams>::KeyType;
type Link<T> = Option<Box<BTreeNode<Key<T>>>>;

/// B-tree of minimum degree `T::MIN_DEGREE`.
///
/// Insertion splits full nodes on the way down and removal tops up thin nodes on the way
/// down, so both run as a single top-down pass.
#[derive(Clone)]
pub struct BTree<T: BTreeParams> {
    root_: Link<T>,
    stats_: TreeStats<T>,
    key_less: T::KeyCompareType,
}

/// Convenient Key Comparison Functions Generated From key_less
impl<T: BTreeParams> BTree<T> {
    pub fn key_comp(&self) -> &T::KeyCompareType {
        &self.key_less
    }

    fn key_equal(&self, a: &Key<T>, b: &Key<T>) -> bool {
        self.key_less.equal(a, b)
    }
}

/// Access Functions to the item count and shape
impl<T: BTreeParams> BTree<T> {
    pub fn len(&self) -> usize {
        self.stats_.size
    }

    pub fn is_empty(&self) -> bool {
        self.root_.is_none()
    }

    pub fn get_stats(&self) -> &TreeStats<T> {
        &self.stats_
    }

    /// Current root, `None` for an empty tree.
    pub fn root(&self) -> Option<&BTreeNode<Key<T>>> {
        self.root_.as_deref()
    }

    /// Number of levels; every leaf sits at this depth.
    pub fn height(&self) -> usize {
        let mut levels = 0;
        let mut n = self.root();
        while let Some(node) = n {
            levels += 1;
            n = node.child(0);
        }
        levels
    }

    /// Nodes grouped by depth, each level ordered left to right.
    pub fn levels(&self) -> Vec<Vec<&BTreeNode<Key<T>>>> {
        let mut levels = Vec::new();
        let mut current: Vec<&BTreeNode<Key<T>>> = self.root().into_iter().collect();
        while !current.is_empty() {
            let next = current.iter().flat_map(|&n| n.children()).collect();
            levels.push(current);
            current = next;
        }
        levels
    }

    pub fn iter(&self) -> BTreeIterator<'_, Key<T>> {
        BTreeIterator::new(self.root())
    }

    /// Release every node and reset the counters.
    pub fn clear(&mut self) {
        log::debug!("BTree::clear on btree size {}", self.len());
        self.root_ = None;
        self.stats_ = TreeStats::new();
    }
}

/// Access function querying the tree by descending from the root
impl<T: BTreeParams> BTree<T> {
    /// Node holding `key`, found by scanning each node for the first key not less than it.
    pub fn search(&self, key: &Key<T>) -> Option<&BTreeNode<Key<T>>> {
        let mut n = self.root()?;
        loop {
            let slot = n.find_lower(&self.key_less, key);
            if slot < n.num_keys() && self.key_equal(&n.keys[slot], key) {
                return Some(n);
            }
            n = n.child(slot)?;
        }
    }

    pub fn contains(&self, key: &Key<T>) -> bool {
        self.search(key).is_some()
    }
}

/// Insertion
impl<T: BTreeParams> BTree<T> {
    /// Insert `key`. Returns false, leaving the tree untouched, if it is already present.
    pub fn insert(&mut self, key: Key<T>) -> bool {
        if self.contains(&key) {
            log::debug!("BTree::insert: duplicate key {:?} ignored", key);
            return false;
        }

        let Self {
            root_,
            stats_,
            key_less,
        } = self;

        match root_.take() {
            None => {
                let mut leaf = BTreeNode::new::<T>(true);
                leaf.keys.push(key);
                stats_.node_created(true);
                *root_ = Some(Box::new(leaf));
            }
            Some(root) if root.is_full::<T>() => {
                log::debug!("BTree::insert: root {:?} is full, growing tree", root.keys);
                let mut new_root = Box::new(BTreeNode::new::<T>(false));
                stats_.node_created(false);
                new_root.children.push(root);
                Self::split_child(&mut new_root, 0, stats_);

                let slot = usize::from(key_less.less(&new_root.keys[0], &key));
                Self::insert_non_full(&mut new_root.children[slot], key, key_less, stats_);
                *root_ = Some(new_root);
            }
            Some(mut root) => {
                Self::insert_non_full(&mut root, key, key_less, stats_);
                *root_ = Some(root);
            }
        }

        stats_.size += 1;
        self.self_verify();
        true
    }

    /// Insert into a subtree whose root is known not to be full, splitting full children
    /// before descending into them.
    fn insert_non_full(
        node: &mut BTreeNode<Key<T>>,
        key: Key<T>,
        key_less: &T::KeyCompareType,
        stats: &mut TreeStats<T>,
    ) {
        let mut slot = node.find_lower(key_less, &key);
        if node.leaf {
            log::trace!(
                "BTree::insert_non_full: put {:?} at leaf slot {}",
                key,
                slot
            );
            node.keys.insert(slot, key);
            return;
        }

        if node.children[slot].is_full::<T>() {
            Self::split_child(node, slot, stats);
            if key_less.less(&node.keys[slot], &key) {
                slot += 1;
            }
        }
        Self::insert_non_full(&mut node.children[slot], key, key_less, stats);
    }

    /// Split the full child at `slot`: its median moves up into `parent` and its upper
    /// `t-1` keys (and `t` children) move into a new right sibling.
    fn split_child(parent: &mut BTreeNode<Key<T>>, slot: usize, stats: &mut TreeStats<T>) {
        let t = T::MIN_DEGREE;
        let child = &mut parent.children[slot];
        debug_assert!(child.keys.len() == T::MAX_KEYS);

        let mut sibling = BTreeNode::new::<T>(child.leaf);
        sibling.keys.extend(child.keys.drain(t..));
        if !child.leaf {
            sibling.children.extend(child.children.drain(t..));
        }
        let median = child.keys.swap_remove(t - 1);
        log::debug!(
            "BTree::split_child: slot {} left {:?} median {:?} right {:?}",
            slot,
            child.keys,
            median,
            sibling.keys
        );

        stats.node_created(sibling.leaf);
        stats.splits += 1;
        parent.keys.insert(slot, median);
        parent.children.insert(slot + 1, Box::new(sibling));
        debug_assert!(parent.keys.len() <= T::MAX_KEYS);
        debug_assert!(parent.children.len() == parent.keys.len() + 1);
    }
}

/// Erase
impl<T: BTreeParams> BTree<T> {
    /// Remove `key`. The result is flagged `NotFound` if it was absent; the tree may still
    /// have been restructured on the way down in that case.
    pub fn remove(&mut self, key: &Key<T>) -> RemovalResult {
        log::debug!("BTree::remove({:?}) on btree size {}", key, self.len());
        let Self {
            root_,
            stats_,
            key_less,
        } = self;

        let Some(root) = root_.as_mut() else {
            return RemovalResult::new(RemovalFlags::NotFound);
        };

        let mut result = Self::remove_descend(root, key, key_less, stats_);

        // an emptied root hands the tree over to its only child
        if root.keys.is_empty() {
            if let Some(old_root) = root_.take() {
                let BTreeNode { children, leaf, .. } = *old_root;
                stats_.node_freed(leaf);
                *root_ = children.into_iter().next();
                result |= RemovalFlags::RootShrunk;
                log::debug!("BTree::remove: root emptied, tree shrinks a level");
            }
        }

        if result.is_removed() {
            stats_.size -= 1;
        }
        self.self_verify();
        result
    }

    fn remove_descend(
        node: &mut BTreeNode<Key<T>>,
        key: &Key<T>,
        key_less: &T::KeyCompareType,
        stats: &mut TreeStats<T>,
    ) -> RemovalResult {
        let slot = node.find_lower(key_less, key);

        if slot < node.keys.len() && key_less.equal(&node.keys[slot], key) {
            if node.leaf {
                log::trace!("BTree::remove: found {:?} in leaf at slot {}", key, slot);
                node.keys.remove(slot);
                return RemovalResult::new(RemovalFlags::Ok);
            }
            return Self::remove_from_inner(node, slot, key_less, stats);
        }

        if node.leaf {
            log::debug!("Could not find key {:?} to erase.", key);
            return RemovalResult::new(RemovalFlags::NotFound);
        }

        let last = slot == node.keys.len();
        let mut result = RemovalResult::new(RemovalFlags::Ok);
        if node.children[slot].is_few::<T>() {
            result |= Self::fill(node, slot, stats);
        }

        // merging the last child into its left sibling moved it one slot left
        let slot = if last && slot > node.keys.len() {
            slot - 1
        } else {
            slot
        };
        result |= Self::remove_descend(&mut node.children[slot], key, key_less, stats);
        result
    }

    /// Remove the key at `slot` of an inner node.
    fn remove_from_inner(
        node: &mut BTreeNode<Key<T>>,
        slot: usize,
        key_less: &T::KeyCompareType,
        stats: &mut TreeStats<T>,
    ) -> RemovalResult {
        if !node.children[slot].is_few::<T>() {
            let pred = node.children[slot].max_key().clone();
            log::trace!(
                "BTree::remove: replace {:?} by predecessor {:?}",
                node.keys[slot],
                pred
            );
            node.keys[slot] = pred.clone();
            Self::remove_descend(&mut node.children[slot], &pred, key_less, stats)
        } else if !node.children[slot + 1].is_few::<T>() {
            let succ = node.children[slot + 1].min_key().clone();
            log::trace!(
                "BTree::remove: replace {:?} by successor {:?}",
                node.keys[slot],
                succ
            );
            node.keys[slot] = succ.clone();
            Self::remove_descend(&mut node.children[slot + 1], &succ, key_less, stats)
        } else {
            let key = node.keys[slot].clone();
            Self::merge_children(node, slot, stats);
            let mut result = Self::remove_descend(&mut node.children[slot], &key, key_less, stats);
            result |= RemovalFlags::Merged;
            result
        }
    }

    /// Bring the child at `slot` up to at least `t` keys before descending into it.
    fn fill(node: &mut BTreeNode<Key<T>>, slot: usize, stats: &mut TreeStats<T>) -> RemovalFlags {
        if slot != 0 && !node.children[slot - 1].is_few::<T>() {
            Self::borrow_from_prev(node, slot, stats);
            RemovalFlags::Borrowed
        } else if slot != node.keys.len() && !node.children[slot + 1].is_few::<T>() {
            Self::borrow_from_next(node, slot, stats);
            RemovalFlags::Borrowed
        } else {
            if slot != node.keys.len() {
                Self::merge_children(node, slot, stats);
            } else {
                Self::merge_children(node, slot - 1, stats);
            }
            RemovalFlags::Merged
        }
    }

    /// Rotate the left sibling's last key up through the parent and the parent's separator
    /// down into the front of the child at `slot`.
    fn borrow_from_prev(node: &mut BTreeNode<Key<T>>, slot: usize, stats: &mut TreeStats<T>) {
        let (head, tail) = node.children.split_at_mut(slot);
        let (sibling, child) = (&mut head[slot - 1], &mut tail[0]);

        debug_assert!(sibling.keys.len() >= T::MIN_DEGREE);

        let borrowed = sibling.keys.remove(sibling.keys.len() - 1);
        let separator = std::mem::replace(&mut node.keys[slot - 1], borrowed);
        log::debug!(
            "BTree::borrow_from_prev: {:?} moves down into slot {}",
            separator,
            slot
        );
        child.keys.insert(0, separator);
        if !sibling.leaf {
            let grandchild = sibling.children.remove(sibling.children.len() - 1);
            child.children.insert(0, grandchild);
        }
        stats.borrows += 1;
    }

    /// Mirror image of [`Self::borrow_from_prev`] using the right sibling.
    fn borrow_from_next(node: &mut BTreeNode<Key<T>>, slot: usize, stats: &mut TreeStats<T>) {
        let (head, tail) = node.children.split_at_mut(slot + 1);
        let (child, sibling) = (&mut head[slot], &mut tail[0]);

        debug_assert!(sibling.keys.len() >= T::MIN_DEGREE);

        let borrowed = sibling.keys.remove(0);
        let separator = std::mem::replace(&mut node.keys[slot], borrowed);
        log::debug!(
            "BTree::borrow_from_next: {:?} moves down into slot {}",
            separator,
            slot
        );
        child.keys.push(separator);
        if !sibling.leaf {
            child.children.push(sibling.children.remove(0));
        }
        stats.borrows += 1;
    }

    /// Fold the child at `slot + 1` and the separator between them into the child at
    /// `slot`. The parent loses one key and one child.
    fn merge_children(node: &mut BTreeNode<Key<T>>, slot: usize, stats: &mut TreeStats<T>) {
        let sibling = node.children.remove(slot + 1);
        let separator = node.keys.remove(slot);
        log::debug!(
            "BTree::merge_children: slot {} absorbs {:?} and {:?}",
            slot,
            separator,
            sibling.keys
        );

        let BTreeNode {
            keys,
            children,
            leaf,
        } = *sibling;
        let child = &mut node.children[slot];
        child.keys.push(separator);
        child.keys.extend(keys);
        child.children.extend(children);
        debug_assert!(child.keys.len() <= T::MAX_KEYS);

        stats.node_freed(leaf);
        stats.merges += 1;
    }
}

/// Verification
impl<T: BTreeParams> BTree<T> {
    /// Check ordering, occupancy bounds, child counts, leaf depth and the tracked size.
    pub fn verify(&self) -> Result<()> {
        let counted = match self.root() {
            None => 0,
            Some(root) if root.keys.is_empty() => return Err(InvariantViolation::EmptyRoot),
            Some(root) => {
                let mut leaf_depth = None;
                self.verify_node(root, 0, None, None, &mut leaf_depth)?
            }
        };
        if counted != self.stats_.size {
            return Err(InvariantViolation::SizeMismatch {
                tracked: self.stats_.size,
                counted,
            });
        }
        Ok(())
    }

    fn verify_node(
        &self,
        node: &BTreeNode<Key<T>>,
        depth: usize,
        lower: Option<&Key<T>>,
        upper: Option<&Key<T>>,
        leaf_depth: &mut Option<usize>,
    ) -> Result<usize> {
        let n = node.keys.len();
        if n > T::MAX_KEYS {
            return Err(InvariantViolation::Overfull {
                depth,
                keys: n,
                max: T::MAX_KEYS,
            });
        }
        if depth > 0 && n < T::MIN_KEYS {
            return Err(InvariantViolation::Underfull {
                depth,
                keys: n,
                min: T::MIN_KEYS,
            });
        }

        let mut prev = lower;
        for key in node.keys.iter().chain(upper) {
            if let Some(p) = prev {
                if !self.key_less.less(p, key) {
                    return Err(InvariantViolation::Unordered {
                        key: format!("{:?}", key),
                        bound: format!("> {:?}", p),
                    });
                }
            }
            prev = Some(key);
        }

        if node.leaf {
            if !node.children.is_empty() {
                return Err(InvariantViolation::ChildCount {
                    depth,
                    keys: n,
                    children: node.children.len(),
                });
            }
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(InvariantViolation::UnevenLeaves {
                        expected,
                        found: depth,
                    })
                }
                Some(_) => {}
            }
            return Ok(n);
        }

        if node.children.len() != n + 1 {
            return Err(InvariantViolation::ChildCount {
                depth,
                keys: n,
                children: node.children.len(),
            });
        }

        let mut count = n;
        for (i, child) in node.children.iter().enumerate() {
            let lo = if i == 0 { lower } else { Some(&node.keys[i - 1]) };
            let hi = if i == n { upper } else { Some(&node.keys[i]) };
            count += self.verify_node(child, depth + 1, lo, hi, leaf_depth)?;
        }
        Ok(count)
    }

    fn self_verify(&self) {
        if !T::SELF_VERIFY {
            return;
        }
        let result = self.verify();
        if let Err(e) = &result {
            log::error!("BTree self-verification failed: {}", e);
        }
        debug_assert!(result.is_ok(), "{:?}\n{:?}", result, self);
    }
}

/// Debug
impl<T: BTreeParams> BTree<T> {
    fn print_node(
        f: &mut std::fmt::Formatter<'_>,
        node: &BTreeNode<Key<T>>,
        depth: usize,
    ) -> std::fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        writeln!(
            f,
            "{} level {} keys {:?}",
            if node.leaf { "leaf" } else { "node" },
            depth,
            node.keys
        )?;
        for child in node.children() {
            Self::print_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

/// Display
impl<T: BTreeParams> std::fmt::Debug for BTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.root() {
            Some(root) => Self::print_node(f, root, 0),
            None => writeln!(f, "(empty)"),
        }
    }
}

impl<T: BTreeParams> Default for BTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BTreeParams> BTree<T> {
    pub fn new() -> Self {
        debug_assert!(T::MIN_DEGREE >= 2, "minimum degree must be at least 2");
        Self {
            root_: None,
            stats_: TreeStats::new(),
            key_less: T::KeyCompareType::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree_base::{BTreeConfig, DefaultBTree};

    fn keys_of(node: &BTreeNode<i32>) -> Vec<i32> {
        node.keys().to_vec()
    }

    #[test]
    fn split_child_promotes_median() {
        let mut tree = DefaultBTree::<i32>::new();
        for k in [10, 20, 30] {
            tree.insert(k);
        }
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.get_stats().splits, 0);

        tree.insert(40);
        let root = tree.root().unwrap();
        assert_eq!(keys_of(root), vec![20]);
        let children: Vec<_> = root.children().map(keys_of).collect();
        assert_eq!(children, vec![vec![10], vec![30, 40]]);
        assert_eq!(tree.get_stats().splits, 1);
        assert_eq!(tree.get_stats().nodes(), 3);
    }

    #[test]
    fn borrow_then_merge_between_siblings() {
        let mut tree = DefaultBTree::<i32>::new();
        for k in [10, 20, 30, 40] {
            tree.insert(k);
        }
        // root [20] over [10] [30, 40]: 10's node borrows 20 and 30 moves up
        let res = tree.remove(&10);
        assert!(res.has(RemovalFlags::Borrowed));
        assert!(!res.has(RemovalFlags::Merged));
        let root = tree.root().unwrap();
        assert_eq!(keys_of(root), vec![30]);
        let children: Vec<_> = root.children().map(keys_of).collect();
        assert_eq!(children, vec![vec![20], vec![40]]);
        assert_eq!(tree.get_stats().borrows, 1);
        tree.verify().unwrap();

        // both children hold a single key now, so they merge and the root goes away
        let res = tree.remove(&40);
        assert!(res.has(RemovalFlags::Merged));
        assert!(res.has(RemovalFlags::RootShrunk));
        assert_eq!(tree.height(), 1);
        assert_eq!(keys_of(tree.root().unwrap()), vec![20, 30]);
        assert_eq!(tree.get_stats().merges, 1);
        assert_eq!(tree.get_stats().nodes(), 1);
        tree.verify().unwrap();
    }

    #[test]
    fn thin_last_child_borrows_from_left_sibling() {
        let mut tree = DefaultBTree::<i32>::new();
        for k in [10, 20, 30, 5] {
            tree.insert(k);
        }
        // root [20] over [5, 10] [30]
        let res = tree.remove(&30);
        assert!(res.is_removed());
        assert!(res.has(RemovalFlags::Borrowed));
        let root = tree.root().unwrap();
        assert_eq!(keys_of(root), vec![10]);
        let children: Vec<_> = root.children().map(keys_of).collect();
        assert_eq!(children, vec![vec![5], vec![20]]);
        tree.verify().unwrap();
    }

    #[test]
    fn removing_absent_key_is_flagged() {
        let mut tree = DefaultBTree::<i32>::new();
        assert!(!tree.remove(&1).is_removed());
        tree.insert(1);
        assert!(!tree.remove(&2).is_removed());
        assert_eq!(tree.len(), 1);
        assert!(tree.remove(&1).has(RemovalFlags::RootShrunk));
        assert!(tree.is_empty());
        assert_eq!(tree.get_stats().nodes(), 0);
    }

    #[test]
    fn wider_degree_holds_more_keys_per_node() {
        let mut tree = BTree::<BTreeConfig<i32, 3>>::new();
        for k in 1..=5 {
            tree.insert(k);
        }
        assert_eq!(tree.height(), 1);
        tree.insert(6);
        assert_eq!(tree.height(), 2);
        assert_eq!(keys_of(tree.root().unwrap()), vec![3]);
        tree.verify().unwrap();
    }

    #[test]
    fn verify_catches_corrupted_nodes() {
        let mut tree = DefaultBTree::<i32>::new();
        for k in 1..=7 {
            tree.insert(k);
        }
        tree.verify().unwrap();

        let mut thin = tree.clone();
        if let Some(root) = thin.root_.as_mut() {
            root.children[0].keys.clear();
        }
        assert!(matches!(
            thin.verify(),
            Err(InvariantViolation::Underfull { depth: 1, .. })
        ));

        let mut unordered = tree.clone();
        if let Some(root) = unordered.root_.as_mut() {
            root.children[2].keys[0] = 0;
        }
        assert_eq!(unordered.verify().unwrap_err().kind(), "unordered");

        let mut miscounted = tree.clone();
        miscounted.stats_.size += 1;
        assert_eq!(
            miscounted.verify(),
            Err(InvariantViolation::SizeMismatch {
                tracked: 8,
                counted: 7
            })
        );
    }
}
