use super::node::BTreeNode;

/// In-order iterator over the keys of a B-tree.
#[derive(Clone, Debug)]
pub struct BTreeIterator<'a, K> {
    stack: Vec<(&'a BTreeNode<K>, usize)>,
}

impl<'a, K> BTreeIterator<'a, K> {
    pub(crate) fn new(root: Option<&'a BTreeNode<K>>) -> Self {
        let mut it = Self { stack: Vec::new() };
        if let Some(root) = root {
            it.push_leftmost(root);
        }
        it
    }

    fn push_leftmost(&mut self, mut node: &'a BTreeNode<K>) {
        loop {
            self.stack.push((node, 0));
            match node.child(0) {
                Some(first) => node = first,
                None => break,
            }
        }
    }
}

impl<'a, K> Iterator for BTreeIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let (node, slot) = *top;
            if slot < node.num_keys() {
                top.1 += 1;
                if let Some(child) = node.child(slot + 1) {
                    self.push_leftmost(child);
                }
                return Some(&node.keys()[slot]);
            }
            self.stack.pop();
        }
    }
}
