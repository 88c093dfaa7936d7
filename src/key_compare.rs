use std::{fmt::Debug, marker::PhantomData};

/// Strict weak ordering used by every tree in the crate.
pub trait KeyComparator<T>: Clone + Debug {
    fn new() -> Self;
    fn less(&self, lhs: &T, rhs: &T) -> bool;

    fn less_equal(&self, lhs: &T, rhs: &T) -> bool {
        !self.less(rhs, lhs)
    }

    fn equal(&self, lhs: &T, rhs: &T) -> bool {
        !self.less(lhs, rhs) && !self.less(rhs, lhs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultKeyComparator<T> {
    _t: PhantomData<T>,
}

impl<T> KeyComparator<T> for DefaultKeyComparator<T>
where
    T: Ord + Clone + Debug,
{
    fn new() -> Self {
        Self { _t: PhantomData }
    }

    fn less(&self, lhs: &T, rhs: &T) -> bool {
        lhs < rhs
    }
}
