//! Tree nodes, rotations and the two rebalancing procedures
//!
//! Heights follow the "absent child = 0, leaf = 1" convention.

use tracing::trace;

pub(crate) type Link<T> = Option<Box<Node<T>>>;

pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) height: usize,
}

impl<T> Node<T> {
    pub(crate) fn leaf(value: T) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    pub(crate) fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

pub(crate) fn height<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

fn balance<T>(link: &Link<T>) -> isize {
    link.as_ref().map_or(0, |node| node.balance())
}

/// Child an insertion descended into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Right rotation around `y`
///
/// ```text
///       y              x
///      / \            / \
///     x   T3   ->   T1   y
///    / \                / \
///  T1   T2            T2   T3
/// ```
pub(crate) fn rotate_right<T>(mut y: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut x) = y.left.take() else {
        return y;
    };

    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Left rotation around `x`, the mirror of [`rotate_right`]
pub(crate) fn rotate_left<T>(mut x: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut y) = x.right.take() else {
        return x;
    };

    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Refresh `node` after an insertion below it and rotate if needed.
///
/// `below` is the side the new value took at the child the insertion went
/// through, or `None` when that child is the new leaf itself.
pub(crate) fn rebalance_inserted<T>(mut node: Box<Node<T>>, below: Option<Side>) -> Box<Node<T>> {
    node.update_height();
    let balance = node.balance();

    match below {
        Some(Side::Left) if balance > 1 => {
            trace!(case = "LL", "rebalancing after insert");
            rotate_right(node)
        }
        Some(Side::Right) if balance < -1 => {
            trace!(case = "RR", "rebalancing after insert");
            rotate_left(node)
        }
        Some(Side::Right) if balance > 1 => {
            trace!(case = "LR", "rebalancing after insert");
            node.left = node.left.take().map(rotate_left);
            rotate_right(node)
        }
        Some(Side::Left) if balance < -1 => {
            trace!(case = "RL", "rebalancing after insert");
            node.right = node.right.take().map(rotate_right);
            rotate_left(node)
        }
        _ => node,
    }
}

/// Refresh `node` after a removal below it and rotate if needed.
///
/// The removed value is gone, so the rotation is chosen from the heavy
/// child's own balance factor.
pub(crate) fn rebalance_removed<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    node.update_height();
    let factor = node.balance();

    if factor > 1 {
        if balance(&node.left) >= 0 {
            trace!(case = "LL", "rebalancing after delete");
        } else {
            trace!(case = "LR", "rebalancing after delete");
            node.left = node.left.take().map(rotate_left);
        }
        rotate_right(node)
    } else if factor < -1 {
        if balance(&node.right) <= 0 {
            trace!(case = "RR", "rebalancing after delete");
        } else {
            trace!(case = "RL", "rebalancing after delete");
            node.right = node.right.take().map(rotate_right);
        }
        rotate_left(node)
    } else {
        node
    }
}
