use std::fmt::Debug;

use super::{
    iter::Iter,
    node::{clone_link, print_node, verify_order, BinaryNode, Link},
};
use crate::{
    errors::{InvariantViolation, Result},
    key_compare::{DefaultKeyComparator, KeyComparator},
};

/// Unbalanced binary search tree.
///
/// Values equal to a node are routed into its right subtree, so duplicates are kept. Depth
/// depends entirely on insertion order, which is why insertion, lookup and teardown walk
/// the tree iteratively.
pub struct BinarySearchTree<K, C = DefaultKeyComparator<K>> {
    root: Link<K>,
    size: usize,
    key_less: C,
}

impl<K: Clone, C: Clone> Clone for BinarySearchTree<K, C> {
    fn clone(&self) -> Self {
        Self {
            root: clone_link(&self.root),
            size: self.size,
            key_less: self.key_less.clone(),
        }
    }
}

impl<K, C> Drop for BinarySearchTree<K, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, C> BinarySearchTree<K, C> {
    /// Release every node without recursing, so a list-shaped tree cannot exhaust the stack.
    pub fn clear(&mut self) {
        let mut pending: Vec<Box<BinaryNode<K>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
        self.size = 0;
    }

    pub fn root(&self) -> Option<&BinaryNode<K>> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels, 0 for an empty tree.
    pub fn height(&self) -> usize {
        self.root().map_or(0, BinaryNode::depth)
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root())
    }
}

impl<K: Clone + Debug, C: KeyComparator<K>> Default for BinarySearchTree<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Debug, C: KeyComparator<K>> BinarySearchTree<K, C> {
    pub fn new() -> Self {
        Self {
            root: None,
            size: 0,
            key_less: C::new(),
        }
    }

    pub fn key_comp(&self) -> &C {
        &self.key_less
    }

    /// Attach `value` as a new leaf. Equal values go right.
    pub fn insert(&mut self, value: K) {
        let cmp = &self.key_less;
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if cmp.less(&value, &node.value) {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        log::trace!("BinarySearchTree::insert({:?})", value);
        *slot = Some(Box::new(BinaryNode::new(value)));
        self.size += 1;
    }

    /// First node on the search path holding `value`.
    pub fn find(&self, value: &K) -> Option<&BinaryNode<K>> {
        let mut curr = self.root();
        while let Some(node) = curr {
            if self.key_less.equal(value, &node.value) {
                return Some(node);
            }
            curr = if self.key_less.less(value, &node.value) {
                node.left()
            } else {
                node.right()
            };
        }
        None
    }

    pub fn contains(&self, value: &K) -> bool {
        self.find(value).is_some()
    }

    /// Remove one occurrence of `value`. Returns false if it was not present.
    pub fn remove(&mut self, value: &K) -> bool {
        let cmp = &self.key_less;
        let mut slot = &mut self.root;
        loop {
            let go_left = match slot.as_deref() {
                None => {
                    log::debug!("BinarySearchTree::remove: {:?} not found", value);
                    return false;
                }
                Some(node) if cmp.equal(value, &node.value) => break,
                Some(node) => cmp.less(value, &node.value),
            };
            slot = match slot {
                Some(node) => {
                    if go_left {
                        &mut node.left
                    } else {
                        &mut node.right
                    }
                }
                None => return false,
            };
        }

        Self::unlink(slot);
        self.size -= 1;
        true
    }

    /// Splice out the node held in `slot`. A node with two children takes the value of the
    /// leftmost node of its right subtree, which is detached instead.
    fn unlink(slot: &mut Link<K>) {
        let Some(mut node) = slot.take() else {
            return;
        };
        *slot = match (node.left.take(), node.right.take()) {
            (None, child) | (child, None) => child,
            (left, right @ Some(_)) => {
                let mut right = right;
                if let Some(successor) = Self::take_min(&mut right) {
                    log::trace!(
                        "BinarySearchTree::unlink: {:?} replaced by successor {:?}",
                        node.value,
                        successor
                    );
                    node.value = successor;
                }
                node.left = left;
                node.right = right;
                Some(node)
            }
        };
    }

    fn take_min(link: &mut Link<K>) -> Option<K> {
        let mut slot = link;
        while slot.as_ref().map_or(false, |n| n.left.is_some()) {
            slot = &mut slot.as_mut()?.left;
        }
        let mut node = slot.take()?;
        *slot = node.right.take();
        Some(node.value)
    }

    /// Check ordering (equal values allowed on the right) and the tracked size.
    pub fn verify(&self) -> Result<()> {
        let counted = match self.root() {
            Some(root) => verify_order(root, true, &self.key_less)?,
            None => 0,
        };
        if counted != self.size {
            return Err(InvariantViolation::SizeMismatch {
                tracked: self.size,
                counted,
            });
        }
        Ok(())
    }
}

impl<K: Debug, C> Debug for BinarySearchTree<K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.root() {
            Some(root) => print_node(f, root, false),
            None => writeln!(f, "(empty)"),
        }
    }
}
