use crate::{
    errors::{InvariantViolation, Result},
    key_compare::KeyComparator,
};

pub type Link<K> = Option<Box<BinaryNode<K>>>;

/// Node shared by the plain BST and the AVL tree.
///
/// `height` is only maintained by the AVL tree; the plain BST leaves every node at 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryNode<K> {
    pub(crate) value: K,
    pub(crate) height: usize,
    pub(crate) left: Link<K>,
    pub(crate) right: Link<K>,
}

impl<K> BinaryNode<K> {
    pub fn new(value: K) -> Self {
        Self {
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub fn value(&self) -> &K {
        &self.value
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn left(&self) -> Option<&BinaryNode<K>> {
        self.left.as_deref()
    }

    #[inline]
    pub fn right(&self) -> Option<&BinaryNode<K>> {
        self.right.as_deref()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Number of nodes in the subtree rooted here.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.left());
            pending.extend(node.right());
        }
        count
    }

    /// Height computed by walking the subtree, independent of the stored field.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut pending: Vec<(&BinaryNode<K>, usize)> = vec![(self, 1)];
        while let Some((node, depth)) = pending.pop() {
            max = max.max(depth);
            pending.extend(node.left().map(|n| (n, depth + 1)));
            pending.extend(node.right().map(|n| (n, depth + 1)));
        }
        max
    }
}

/// Stored height of a possibly absent subtree.
#[inline]
pub(crate) fn height<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

impl<K> BinaryNode<K> {
    #[inline]
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    #[inline]
    pub(crate) fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

/// Leftmost value of a subtree.
pub(crate) fn min_value<K>(node: &BinaryNode<K>) -> &K {
    let mut curr = node;
    while let Some(left) = curr.left() {
        curr = left;
    }
    &curr.value
}

/// Deep copy of a subtree built bottom-up with an explicit stack.
pub(crate) fn clone_link<K: Clone>(link: &Link<K>) -> Link<K> {
    enum Step<'a, K> {
        Enter(&'a BinaryNode<K>),
        Build(&'a BinaryNode<K>),
    }

    let root = link.as_deref()?;
    let mut steps = vec![Step::Enter(root)];
    let mut built: Vec<Box<BinaryNode<K>>> = Vec::new();
    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(node) => {
                steps.push(Step::Build(node));
                steps.extend(node.right().map(Step::Enter));
                steps.extend(node.left().map(Step::Enter));
            }
            Step::Build(node) => {
                // children finish before their parent: right on top, left below it
                let right = node.right.as_ref().and_then(|_| built.pop());
                let left = node.left.as_ref().and_then(|_| built.pop());
                built.push(Box::new(BinaryNode {
                    value: node.value.clone(),
                    height: node.height,
                    left,
                    right,
                }));
            }
        }
    }
    debug_assert!(built.len() == 1);
    built.pop()
}

/// Check the search ordering of a subtree and count its nodes.
///
/// Each value must lie strictly between the bounds set by its ancestors, except that
/// `equal_right` admits values equal to an ancestor in its right subtree.
pub(crate) fn verify_order<K, C>(node: &BinaryNode<K>, equal_right: bool, cmp: &C) -> Result<usize>
where
    K: std::fmt::Debug,
    C: KeyComparator<K>,
{
    let mut count = 0;
    let mut pending: Vec<(&BinaryNode<K>, Option<&K>, Option<&K>)> = vec![(node, None, None)];
    while let Some((node, lower, upper)) = pending.pop() {
        if let Some(lo) = lower {
            let ok = if equal_right {
                cmp.less_equal(lo, &node.value)
            } else {
                cmp.less(lo, &node.value)
            };
            if !ok {
                return Err(InvariantViolation::Unordered {
                    key: format!("{:?}", node.value),
                    bound: format!("> {:?}", lo),
                });
            }
        }
        if let Some(hi) = upper {
            if !cmp.less(&node.value, hi) {
                return Err(InvariantViolation::Unordered {
                    key: format!("{:?}", node.value),
                    bound: format!("< {:?}", hi),
                });
            }
        }

        count += 1;
        pending.extend(node.left().map(|n| (n, lower, Some(&node.value))));
        pending.extend(node.right().map(|n| (n, Some(&node.value), upper)));
    }
    Ok(count)
}

/// Indentation stops growing past this depth; deeper lines carry their depth instead.
const MAX_INDENT: usize = 32;

/// Print a subtree sideways, right subtree on top.
pub(crate) fn print_node<K: std::fmt::Debug>(
    f: &mut std::fmt::Formatter<'_>,
    node: &BinaryNode<K>,
    with_height: bool,
) -> std::fmt::Result {
    let mut stack = Vec::new();
    let mut curr = Some((node, 0usize));
    loop {
        while let Some((n, depth)) = curr {
            stack.push((n, depth));
            curr = n.right().map(|r| (r, depth + 1));
        }
        let Some((n, depth)) = stack.pop() else {
            break;
        };

        write!(f, "{:width$}", "", width = 4 * depth.min(MAX_INDENT))?;
        if depth > MAX_INDENT {
            write!(f, "[{}] ", depth)?;
        }
        if with_height {
            writeln!(f, "{:?} (h={})", n.value, n.height)?;
        } else {
            writeln!(f, "{:?}", n.value)?;
        }
        curr = n.left().map(|l| (l, depth + 1));
    }
    Ok(())
}
