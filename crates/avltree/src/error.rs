//! Error types for avltree

use std::fmt;

/// Result type alias for avltree diagnostics
pub type Result<T> = std::result::Result<T, Error>;

/// Structural invariant violations reported by
/// [`AvlTree::validate`](crate::AvlTree::validate)
///
/// These never come from caller input. Seeing one means the tree itself
/// is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A value sits outside the bounds set by its ancestors
    OrderViolation,

    /// Subtree heights differ by more than one
    Unbalanced {
        /// height(left) - height(right) at the offending node
        balance: isize,
    },

    /// Cached height disagrees with the subtree's real height
    StaleHeight {
        /// Height stored in the node
        cached: usize,
        /// Height recomputed from the children
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OrderViolation => write!(f, "BST order violated"),
            Error::Unbalanced { balance } => {
                write!(f, "Unbalanced node: balance factor {}", balance)
            }
            Error::StaleHeight { cached, actual } => {
                write!(f, "Stale height: cached {}, actual {}", cached, actual)
            }
        }
    }
}

impl std::error::Error for Error {}
