use std::collections::BTreeSet;

use rand::{seq::SliceRandom, thread_rng, Rng};
use search_trees::{logging, AvlTree, BinaryNode};

fn values(tree: &AvlTree<i32>) -> Vec<i32> {
    tree.iter().copied().collect()
}

fn value_of(node: Option<&BinaryNode<i32>>) -> Option<i32> {
    node.map(|n| *n.value())
}

#[test]
fn ascending_inserts_rotate_left_once() {
    logging::init();
    let mut tree = AvlTree::<i32>::new();
    for v in [10, 20, 30] {
        assert!(tree.insert(v));
    }

    let root = tree.root().unwrap();
    assert_eq!(*root.value(), 20);
    assert_eq!(value_of(root.left()), Some(10));
    assert_eq!(value_of(root.right()), Some(30));
    assert_eq!(root.height(), 2);
    assert_eq!(root.depth(), 2);
    assert_eq!(tree.stats().left_rotations, 1);
    assert_eq!(tree.stats().right_rotations, 0);
}

#[test]
fn removal_keeps_tree_balanced() {
    logging::init();
    let mut tree = AvlTree::<i32>::new();
    for v in [30, 20, 40, 10, 25, 35, 50] {
        tree.insert(v);
    }
    assert!(tree.remove(&40));

    tree.verify().unwrap();
    assert_eq!(values(&tree), vec![10, 20, 25, 30, 35, 50]);
    assert_eq!(tree.len(), 6);
    assert!(tree.find(&40).is_none());
}

#[test]
fn duplicate_insert_is_a_no_op() {
    logging::init();
    let mut dup = AvlTree::<i32>::new();
    assert!(dup.insert(7));
    assert!(!dup.insert(7));

    let mut distinct = AvlTree::<i32>::new();
    distinct.insert(7);
    distinct.insert(8);

    let dup_nodes = dup.root().map_or(0, BinaryNode::subtree_len);
    let distinct_nodes = distinct.root().map_or(0, BinaryNode::subtree_len);
    assert_eq!(dup_nodes + 1, distinct_nodes);
    assert_eq!(values(&dup), vec![7]);
    assert_eq!(dup.len(), 1);
}

#[test]
fn queries_on_empty_tree() {
    let mut tree = AvlTree::<i32>::new();
    assert!(tree.find(&1).is_none());
    assert!(!tree.remove(&1));
    assert_eq!(tree.height(), 0);
    tree.clear();
    tree.clear();
    assert!(tree.is_empty());
    tree.verify().unwrap();
}

#[test]
fn clear_releases_everything() {
    let mut tree = AvlTree::<i32>::new();
    for v in 0..100 {
        tree.insert(v);
    }
    tree.clear();
    assert!(tree.root().is_none());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.stats().rotations(), 0);
    assert!(tree.insert(3));
    assert_eq!(values(&tree), vec![3]);
}

#[test]
fn balanced_after_every_insert() {
    logging::init();
    let mut rng = thread_rng();
    let mut tree = AvlTree::<i32>::new();
    for _ in 0..2000 {
        tree.insert(rng.gen_range(0..5000));
        tree.verify().unwrap();
    }
    // height of an AVL tree stays below 1.45 log2(n + 2)
    let bound = 1.45 * ((tree.len() + 2) as f64).log2();
    assert!((tree.height() as f64) < bound);
    assert_eq!(tree.root().map_or(0, BinaryNode::depth), tree.height());
}

#[test]
fn removal_against_the_heavy_childs_lean_is_a_double_rotation() {
    logging::init();
    // 40 leaves; 30 is left-heavy while its child 20 leans right
    let mut tree = AvlTree::<i32>::new();
    for v in [30, 20, 40, 25] {
        tree.insert(v);
    }
    assert_eq!(tree.stats().rotations(), 0);
    assert!(tree.remove(&40));
    assert_eq!(tree.stats().left_rotations, 1);
    assert_eq!(tree.stats().right_rotations, 1);
    let root = tree.root().unwrap();
    assert_eq!(*root.value(), 25);
    assert_eq!(value_of(root.left()), Some(20));
    assert_eq!(value_of(root.right()), Some(30));
    assert_eq!(root.depth(), 2);
    tree.verify().unwrap();

    // mirror image: 20 is right-heavy while its child 30 leans left
    let mut tree = AvlTree::<i32>::new();
    for v in [20, 10, 30, 25] {
        tree.insert(v);
    }
    assert!(tree.remove(&10));
    assert_eq!(tree.stats().left_rotations, 1);
    assert_eq!(tree.stats().right_rotations, 1);
    assert_eq!(value_of(tree.root()), Some(25));
    assert_eq!(values(&tree), vec![20, 25, 30]);
    tree.verify().unwrap();
}

#[test]
fn insert_all_then_remove_all_in_random_order() {
    logging::init();
    let mut rng = thread_rng();
    let mut keys: Vec<i32> = (0..1000).collect();
    keys.shuffle(&mut rng);

    let mut tree = AvlTree::<i32>::new();
    for &k in keys.iter() {
        assert!(tree.insert(k));
    }
    assert_eq!(tree.len(), keys.len());

    keys.shuffle(&mut rng);
    for &k in keys.iter() {
        assert!(tree.remove(&k));
        tree.verify().unwrap();
    }
    assert!(tree.root().is_none());
    assert!(tree.is_empty());
}

#[test]
fn random_op_test() {
    logging::init();
    let mut rng = thread_rng();
    let mut tree = AvlTree::<i32>::new();
    let mut oracle = BTreeSet::new();

    for _ in 0..5000 {
        let key = rng.gen_range(0..300);
        if rng.gen_bool(0.55) {
            assert_eq!(tree.insert(key), oracle.insert(key));
        } else {
            assert_eq!(tree.remove(&key), oracle.remove(&key));
        }
        tree.verify().unwrap();
    }

    assert_eq!(values(&tree), oracle.iter().copied().collect::<Vec<_>>());
    for key in 0..300 {
        assert_eq!(tree.find(&key).is_some(), oracle.contains(&key));
    }
}
