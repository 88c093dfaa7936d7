use std::fmt;

/// Structural invariant broken inside a tree, as reported by `verify()`.
///
/// Mutations never produce these; a violation means the engine itself has a bug. Keys are
/// rendered with their `Debug` form so the error type stays independent of the key type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Keys out of order, either inside a node or across a parent/child boundary.
    Unordered { key: String, bound: String },
    /// Stored AVL height disagrees with the heights of the children.
    HeightMismatch { key: String, stored: usize, computed: usize },
    /// AVL balance factor outside `[-1, 1]`.
    Unbalanced { key: String, balance: isize },
    /// B-tree node holds fewer keys than the minimum degree allows.
    Underfull { depth: usize, keys: usize, min: usize },
    /// B-tree node holds more keys than `2t-1`.
    Overfull { depth: usize, keys: usize, max: usize },
    /// Internal B-tree node whose child count is not `keys + 1`, or a leaf with children.
    ChildCount { depth: usize, keys: usize, children: usize },
    /// B-tree leaves found at different depths.
    UnevenLeaves { expected: usize, found: usize },
    /// Non-empty B-tree whose root has no keys.
    EmptyRoot,
    /// Tracked element count differs from the number of keys reachable from the root.
    SizeMismatch { tracked: usize, counted: usize },
}

impl InvariantViolation {
    /// Short stable name of the violated invariant.
    pub fn kind(&self) -> &'static str {
        match self {
            InvariantViolation::Unordered { .. } => "unordered",
            InvariantViolation::HeightMismatch { .. } => "height-mismatch",
            InvariantViolation::Unbalanced { .. } => "unbalanced",
            InvariantViolation::Underfull { .. } => "underfull",
            InvariantViolation::Overfull { .. } => "overfull",
            InvariantViolation::ChildCount { .. } => "child-count",
            InvariantViolation::UnevenLeaves { .. } => "uneven-leaves",
            InvariantViolation::EmptyRoot => "empty-root",
            InvariantViolation::SizeMismatch { .. } => "size-mismatch",
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::Unordered { key, bound } => {
                write!(f, "key {} violates ordering bound {}", key, bound)
            }
            InvariantViolation::HeightMismatch {
                key,
                stored,
                computed,
            } => write!(
                f,
                "node {} stores height {} but its subtrees give {}",
                key, stored, computed
            ),
            InvariantViolation::Unbalanced { key, balance } => {
                write!(f, "node {} has balance factor {}", key, balance)
            }
            InvariantViolation::Underfull { depth, keys, min } => write!(
                f,
                "node at depth {} holds {} keys, minimum is {}",
                depth, keys, min
            ),
            InvariantViolation::Overfull { depth, keys, max } => write!(
                f,
                "node at depth {} holds {} keys, maximum is {}",
                depth, keys, max
            ),
            InvariantViolation::ChildCount {
                depth,
                keys,
                children,
            } => write!(
                f,
                "node at depth {} has {} keys but {} children",
                depth, keys, children
            ),
            InvariantViolation::UnevenLeaves { expected, found } => write!(
                f,
                "leaf found at depth {}, expected all leaves at depth {}",
                found, expected
            ),
            InvariantViolation::EmptyRoot => write!(f, "non-empty tree has a root without keys"),
            InvariantViolation::SizeMismatch { tracked, counted } => write!(
                f,
                "tree tracks {} keys but {} are reachable",
                tracked, counted
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

pub type Result<T> = std::result::Result<T, InvariantViolation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_the_offending_values() {
        let err = InvariantViolation::Underfull {
            depth: 2,
            keys: 0,
            min: 1,
        };
        assert_eq!(err.to_string(), "node at depth 2 holds 0 keys, minimum is 1");
        assert_eq!(err.kind(), "underfull");
    }
}
