use std::marker::PhantomData;

use super::btree_traits::BTreeParams;

/// Node census and restructuring counters of a B-tree.
#[derive(Clone, Debug)]
pub struct TreeStats<T: BTreeParams> {
    _phantom: PhantomData<T>,
    pub size: usize,
    pub leaves: usize,
    pub inner_nodes: usize,
    pub splits: usize,
    pub borrows: usize,
    pub merges: usize,
}

impl<T: BTreeParams> Default for TreeStats<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BTreeParams> TreeStats<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
            size: 0,
            leaves: 0,
            inner_nodes: 0,
            splits: 0,
            borrows: 0,
            merges: 0,
        }
    }

    pub fn nodes(&self) -> usize {
        self.inner_nodes + self.leaves
    }

    /// Average share of key slots in use across all nodes.
    pub fn avg_fill(&self) -> f64 {
        if self.nodes() == 0 {
            return 0.0;
        }
        self.size as f64 / (self.nodes() * T::MAX_KEYS) as f64
    }

    pub(crate) fn node_created(&mut self, leaf: bool) {
        if leaf {
            self.leaves += 1;
        } else {
            self.inner_nodes += 1;
        }
    }

    pub(crate) fn node_freed(&mut self, leaf: bool) {
        if leaf {
            self.leaves -= 1;
        } else {
            self.inner_nodes -= 1;
        }
    }
}
