//! AVL tree: ordered set kept balanced by rotations
//!
//! Insert and delete recurse down to the affected leaf and hand the
//! (possibly new) subtree root back to the parent, so nodes never need
//! parent pointers.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::error::{Error, Result};
use crate::iter::{Inorder, LevelOrder};
use crate::node::{height, rebalance_inserted, rebalance_removed, Link, Node, Side};

/// What an insertion did at the root of a subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Descent {
    /// Value already present, nothing changed
    Duplicate,
    /// This subtree is the new leaf
    Leaf,
    /// Value went down this side
    Went(Side),
}

impl Descent {
    fn side(self) -> Option<Side> {
        match self {
            Descent::Went(side) => Some(side),
            _ => None,
        }
    }
}

/// Self-balancing binary search tree without duplicates
///
/// Every node's left subtree holds only smaller values, its right subtree
/// only larger ones, and the heights of the two differ by at most one.
pub struct AvlTree<T> {
    root: Link<T>,
    len: usize,
}

impl<T> AvlTree<T> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of values stored
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree: 0 when empty, 1 for a single node
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Value at the root
    pub fn root(&self) -> Option<&T> {
        self.root.as_ref().map(|node| &node.value)
    }

    /// Smallest value
    pub fn min(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.value)
    }

    /// Largest value
    pub fn max(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.value)
    }

    /// Values in ascending order
    pub fn inorder(&self) -> Inorder<'_, T> {
        Inorder::new(&self.root, self.len)
    }

    /// Values level by level, left to right
    pub fn level_order(&self) -> LevelOrder<'_, T> {
        LevelOrder::new(&self.root, self.len)
    }

    /// Remove every value
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }
}

impl<T: Ord> AvlTree<T> {
    /// Insert a value
    ///
    /// Returns `false` and leaves the tree untouched when the value is
    /// already present.
    pub fn insert(&mut self, value: T) -> bool {
        let (root, descent) = insert_at(self.root.take(), value);
        self.root = Some(root);

        let inserted = descent != Descent::Duplicate;
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Check whether a value is present
    pub fn search(&self, value: &T) -> bool {
        let mut link = &self.root;
        while let Some(node) = link {
            link = match value.cmp(&node.value) {
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Alias for [`search`](Self::search)
    pub fn contains(&self, value: &T) -> bool {
        self.search(value)
    }

    /// Delete a value, returning whether it was present
    pub fn delete(&mut self, value: &T) -> bool {
        self.remove(value).is_some()
    }

    /// Delete a value and hand it back
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let (root, removed) = remove_at(self.root.take(), value);
        self.root = root;

        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Check ordering, balance and cached heights at every node
    ///
    /// # Errors
    /// Returns the first violation found, in post-order.
    pub fn validate(&self) -> Result<()> {
        check(&self.root, None, None).map(|_| ())
    }

    /// Whether the tree satisfies every AVL invariant
    pub fn is_valid_avl(&self) -> bool {
        self.validate().is_ok()
    }
}

fn insert_at<T: Ord>(link: Link<T>, value: T) -> (Box<Node<T>>, Descent) {
    let mut node = match link {
        None => return (Node::leaf(value), Descent::Leaf),
        Some(node) => node,
    };

    let (side, below) = match value.cmp(&node.value) {
        Ordering::Less => {
            let (child, below) = insert_at(node.left.take(), value);
            node.left = Some(child);
            (Side::Left, below)
        }
        Ordering::Greater => {
            let (child, below) = insert_at(node.right.take(), value);
            node.right = Some(child);
            (Side::Right, below)
        }
        Ordering::Equal => return (node, Descent::Duplicate),
    };

    if below == Descent::Duplicate {
        return (node, Descent::Duplicate);
    }

    (rebalance_inserted(node, below.side()), Descent::Went(side))
}

fn remove_at<T: Ord>(link: Link<T>, value: &T) -> (Link<T>, Option<T>) {
    let Some(mut node) = link else {
        return (None, None);
    };

    let removed = match value.cmp(&node.value) {
        Ordering::Less => {
            let (child, removed) = remove_at(node.left.take(), value);
            node.left = child;
            removed
        }
        Ordering::Greater => {
            let (child, removed) = remove_at(node.right.take(), value);
            node.right = child;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, child) | (child, None) => {
                let Node { value: removed, .. } = *node;
                return (child, Some(removed));
            }
            (Some(left), Some(right)) => {
                // Promote the in-order successor
                let (rest, successor) = remove_min(right);
                node.left = Some(left);
                node.right = rest;
                Some(mem::replace(&mut node.value, successor))
            }
        },
    };

    if removed.is_none() {
        return (Some(node), None);
    }

    (Some(rebalance_removed(node)), removed)
}

fn remove_min<T>(mut node: Box<Node<T>>) -> (Link<T>, T) {
    match node.left.take() {
        None => {
            let Node { value, right, .. } = *node;
            (right, value)
        }
        Some(left) => {
            let (rest, min) = remove_min(left);
            node.left = rest;
            (Some(rebalance_removed(node)), min)
        }
    }
}

fn check<'a, T: Ord>(link: &'a Link<T>, lower: Option<&'a T>, upper: Option<&'a T>) -> Result<usize> {
    let Some(node) = link else {
        return Ok(0);
    };

    if lower.is_some_and(|lo| node.value <= *lo) || upper.is_some_and(|hi| node.value >= *hi) {
        return Err(Error::OrderViolation);
    }

    let left = check(&node.left, lower, Some(&node.value))?;
    let right = check(&node.right, Some(&node.value), upper)?;

    let balance = left as isize - right as isize;
    if balance.abs() > 1 {
        return Err(Error::Unbalanced { balance });
    }

    let actual = 1 + left.max(right);
    if node.height != actual {
        return Err(Error::StaleHeight {
            cached: node.height,
            actual,
        });
    }

    Ok(actual)
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inorder()).finish()
    }
}

impl<T: Ord> Extend<T> for AvlTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T> {
    type Item = &'a T;
    type IntoIter = Inorder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inorder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn inorder<T: Copy>(tree: &AvlTree<T>) -> Vec<T> {
        tree.inorder().copied().collect()
    }

    fn level_order<T: Copy>(tree: &AvlTree<T>) -> Vec<T> {
        tree.level_order().copied().collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree: AvlTree<i32> = AvlTree::new();

        // Absent subtrees have height 0
        assert_eq!(tree.height(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.min(), None);
        assert_eq!(tree.inorder().count(), 0);
        assert_eq!(tree.level_order().count(), 0);
        assert!(tree.is_valid_avl());
    }

    #[test]
    fn test_single_node_height_is_one() {
        let mut tree = AvlTree::new();
        assert!(tree.insert(42));

        assert_eq!(tree.height(), 1);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), Some(&42));
    }

    #[test]
    fn test_ascending_inserts_rotate_left() {
        let tree: AvlTree<_> = [10, 20, 30].into_iter().collect();

        assert_eq!(tree.root(), Some(&20));
        assert_eq!(inorder(&tree), vec![10, 20, 30]);
        assert_eq!(level_order(&tree), vec![20, 10, 30]);
        assert_eq!(tree.height(), 2);
        assert!(tree.is_valid_avl());
    }

    #[test]
    fn test_descending_inserts_rotate_right() {
        let tree: AvlTree<_> = [30, 20, 10].into_iter().collect();

        assert_eq!(tree.root(), Some(&20));
        assert_eq!(level_order(&tree), vec![20, 10, 30]);
    }

    #[test]
    fn test_left_right_insert() {
        let tree: AvlTree<_> = [30, 10, 20].into_iter().collect();

        assert_eq!(level_order(&tree), vec![20, 10, 30]);
        assert!(tree.is_valid_avl());
    }

    #[test]
    fn test_right_left_insert() {
        let tree: AvlTree<_> = [10, 30, 20].into_iter().collect();

        assert_eq!(level_order(&tree), vec![20, 10, 30]);
        assert!(tree.is_valid_avl());
    }

    #[test]
    fn test_walkthrough_inserts_and_deletes() {
        let mut tree: AvlTree<_> = [10, 20, 30, 40, 50, 25].into_iter().collect();

        assert_eq!(inorder(&tree), vec![10, 20, 25, 30, 40, 50]);
        assert_eq!(level_order(&tree), vec![30, 20, 40, 10, 25, 50]);
        assert_eq!(tree.height(), 3);
        assert!(tree.search(&25));
        assert!(!tree.search(&55));

        assert!(tree.delete(&20));
        assert_eq!(inorder(&tree), vec![10, 25, 30, 40, 50]);
        assert_eq!(level_order(&tree), vec![30, 25, 40, 10, 50]);
        assert!(tree.is_valid_avl());

        assert!(tree.delete(&30));
        assert_eq!(inorder(&tree), vec![10, 25, 40, 50]);
        assert_eq!(level_order(&tree), vec![40, 25, 50, 10]);
        assert_eq!(tree.height(), 3);
        assert!(tree.is_valid_avl());
    }

    #[test]
    fn test_sequential_inserts_stay_logarithmic() {
        let mut tree = AvlTree::new();
        for i in 1..=10 {
            tree.insert(i);
            assert!(tree.is_valid_avl());
        }

        // A plain BST would have height 10 here
        assert_eq!(tree.height(), 4);
        assert_eq!(level_order(&tree), vec![4, 2, 8, 1, 3, 6, 9, 5, 7, 10]);
        assert_eq!(inorder(&tree), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut tree: AvlTree<_> = [2, 1, 3].into_iter().collect();

        assert!(!tree.insert(2));
        assert!(!tree.insert(3));

        assert_eq!(tree.len(), 3);
        assert_eq!(level_order(&tree), vec![2, 1, 3]);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut tree: AvlTree<_> = [2, 1, 3].into_iter().collect();

        assert!(!tree.delete(&7));
        assert_eq!(tree.remove(&0), None);

        assert_eq!(tree.len(), 3);
        assert_eq!(level_order(&tree), vec![2, 1, 3]);
    }

    #[test]
    fn test_delete_two_children_promotes_successor() {
        let mut tree: AvlTree<_> = [50, 30, 70, 20, 40, 60, 80].into_iter().collect();

        assert_eq!(tree.remove(&30), Some(30));

        assert_eq!(level_order(&tree), vec![50, 40, 70, 20, 60, 80]);
        assert_eq!(inorder(&tree), vec![20, 40, 50, 60, 70, 80]);
        assert_eq!(tree.len(), 6);
        assert!(tree.is_valid_avl());
    }

    #[test]
    fn test_delete_root_of_two_node_tree() {
        let mut tree: AvlTree<_> = [1, 2].into_iter().collect();

        assert!(tree.delete(&1));
        assert_eq!(tree.root(), Some(&2));
        assert_eq!(tree.height(), 1);

        assert!(tree.delete(&2));
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_delete_uses_child_balance_for_rotation() {
        // Left child 10 ends up perfectly balanced once 30 is gone, so a
        // single right rotation is used instead of a double one.
        let mut tree: AvlTree<_> = [20, 10, 30, 5, 15].into_iter().collect();

        tree.delete(&30);

        assert_eq!(level_order(&tree), vec![10, 5, 20, 15]);
        assert!(tree.is_valid_avl());
    }

    #[test]
    fn test_delete_right_left_case() {
        let mut tree: AvlTree<_> = [20, 10, 30, 25].into_iter().collect();

        tree.delete(&10);

        assert_eq!(level_order(&tree), vec![25, 20, 30]);
        assert!(tree.is_valid_avl());
    }

    #[test]
    fn test_insert_then_delete_restores_content() {
        let mut tree: AvlTree<_> = (0..50).map(|i| i * 3).collect();
        let before = inorder(&tree);

        tree.insert(31);
        assert!(tree.search(&31));
        tree.delete(&31);

        assert_eq!(inorder(&tree), before);
        assert!(tree.is_valid_avl());
    }

    #[test]
    fn test_min_max() {
        let tree: AvlTree<_> = [8, 3, 12, 1, 20].into_iter().collect();

        assert_eq!(tree.min(), Some(&1));
        assert_eq!(tree.max(), Some(&20));
    }

    #[test]
    fn test_clear() {
        let mut tree: AvlTree<_> = (1..=5).collect();

        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.insert(1));
    }

    #[test]
    fn test_string_values() {
        let mut tree = AvlTree::new();
        for word in ["pear", "apple", "fig", "kiwi", "banana"] {
            tree.insert(word.to_string());
        }

        let words: Vec<&str> = tree.inorder().map(String::as_str).collect();
        assert_eq!(words, vec!["apple", "banana", "fig", "kiwi", "pear"]);
        assert!(tree.contains(&"fig".to_string()));
    }

    #[test]
    fn test_debug_and_into_iter() {
        let tree: AvlTree<_> = [3, 1, 2].into_iter().collect();

        assert_eq!(format!("{:?}", tree), "{1, 2, 3}");
        assert_eq!((&tree).into_iter().len(), 3);

        let mut total = 0;
        for value in &tree {
            total += value;
        }
        assert_eq!(total, 6);
    }

    #[test]
    fn test_validate_reports_order_violation() {
        let mut root = Node::leaf(10);
        root.left = Some(Node::leaf(15));
        root.update_height();
        let tree = AvlTree { root: Some(root), len: 2 };

        assert_eq!(tree.validate(), Err(Error::OrderViolation));
        assert!(!tree.is_valid_avl());
    }

    #[test]
    fn test_validate_reports_imbalance() {
        let mut middle = Node::leaf(2);
        middle.left = Some(Node::leaf(1));
        middle.update_height();
        let mut root = Node::leaf(3);
        root.left = Some(middle);
        root.update_height();
        let tree = AvlTree { root: Some(root), len: 3 };

        assert_eq!(tree.validate(), Err(Error::Unbalanced { balance: 2 }));
    }

    #[test]
    fn test_validate_reports_stale_height() {
        let mut root = Node::leaf(2);
        root.right = Some(Node::leaf(3));
        let tree = AvlTree { root: Some(root), len: 2 };

        assert_eq!(
            tree.validate(),
            Err(Error::StaleHeight { cached: 1, actual: 2 })
        );
    }

    #[test]
    fn test_matches_reference_set() {
        let mut rng = StdRng::seed_from_u64(0xa71);
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();

        for _ in 0..4000 {
            let value: u16 = rng.gen_range(0..300);

            if rng.gen_bool(0.6) {
                assert_eq!(tree.insert(value), model.insert(value));
            } else {
                assert_eq!(tree.delete(&value), model.remove(&value));
            }

            assert_eq!(tree.validate(), Ok(()));
            assert_eq!(tree.len(), model.len());
            assert_eq!(tree.search(&value), model.contains(&value));

            let bound = 1.45 * ((tree.len() + 2) as f64).log2();
            assert!((tree.height() as f64) <= bound);
        }

        assert!(tree.inorder().eq(model.iter()));
        assert_eq!(tree.min(), model.first());
        assert_eq!(tree.max(), model.last());
    }
}
