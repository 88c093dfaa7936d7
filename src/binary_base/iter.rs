use super::node::BinaryNode;

/// In-order iterator over the values of a binary tree.
#[derive(Clone, Debug)]
pub struct Iter<'a, K> {
    stack: Vec<&'a BinaryNode<K>>,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(root: Option<&'a BinaryNode<K>>) -> Self {
        let mut it = Self { stack: Vec::new() };
        it.push_left(root);
        it
    }

    fn push_left(&mut self, mut node: Option<&'a BinaryNode<K>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right());
        Some(node.value())
    }
}
