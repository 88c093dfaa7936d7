pub mod avl;
pub mod bst;
pub mod iter;
pub mod node;
