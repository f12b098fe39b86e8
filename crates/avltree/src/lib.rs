//! # avltree
//!
//! Ordered set backed by an AVL tree: a binary search tree that rotates
//! after every insert and delete so sibling subtree heights never differ
//! by more than one.
//!
//! - Search, insert and delete are O(log n)
//! - Duplicate inserts and deletes of absent values are silent no-ops
//! - Heights count nodes: an empty tree has height 0, a single node 1
//!
//! ```
//! use avltree::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for value in [10, 20, 30] {
//!     tree.insert(value);
//! }
//! assert_eq!(tree.root(), Some(&20));
//! assert!(tree.is_valid_avl());
//! ```

#![warn(missing_docs)]

mod error;
mod iter;
mod node;
mod tree;

pub use error::{Error, Result};
pub use iter::{Inorder, LevelOrder};
pub use tree::AvlTree;
