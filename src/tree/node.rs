//! Tree node representation
//!
//! One key plus the structural metadata the engine keeps current:
//!   height(node) = 1 + max(height(left), height(right)), height(∅) = 0
//!   bf(node)     = height(left) - height(right)
//!
//! Children are owned exclusively. No parent pointers: every walk is top-down.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Side;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Identity token assigned once when a node is created
///
/// Clones keep the id, so the same logical node can be tracked across
/// structurally distinct snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u64);

impl NodeId {
    /// Issue an id that has never been handed out before in this process
    pub fn fresh() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Owned, possibly empty subtree
pub type Link = Option<Box<TreeNode>>;

/// One key of the AVL tree
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "visualize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TreeNode {
    /// Stable identity across snapshots
    pub id: NodeId,

    /// Ordering key
    pub value: i64,

    /// Height of the subtree rooted here (leaf = 1)
    pub height: u32,

    /// height(left) - height(right)
    pub balance_factor: i32,

    /// Left subtree (keys < value)
    pub left: Link,

    /// Right subtree (keys > value)
    pub right: Link,

    /// Horizontal position in percent, set by layout
    pub x: f64,

    /// Vertical position, set by layout
    pub y: f64,
}

impl TreeNode {
    /// Fresh leaf with a new identity
    pub fn leaf(value: i64) -> Self {
        Self {
            id: NodeId::fresh(),
            value,
            height: 1,
            balance_factor: 0,
            left: None,
            right: None,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Height of an optional subtree (0 when absent)
    #[inline]
    pub fn height_of(node: Option<&TreeNode>) -> u32 {
        node.map_or(0, |n| n.height)
    }

    /// Balance factor recomputed from the children's stored heights
    #[inline]
    pub fn balance_of(node: Option<&TreeNode>) -> i32 {
        node.map_or(0, |n| n.computed_balance())
    }

    /// height(left) - height(right) from the children as they are now
    pub fn computed_balance(&self) -> i32 {
        Self::height_of(self.left.as_deref()) as i32 - Self::height_of(self.right.as_deref()) as i32
    }

    /// Recompute `height` and `balance_factor` from the children
    ///
    /// Children must already be current; callers refresh bottom-up.
    pub fn refresh(&mut self) {
        let left = Self::height_of(self.left.as_deref());
        let right = Self::height_of(self.right.as_deref());
        self.height = 1 + left.max(right);
        self.balance_factor = left as i32 - right as i32;
    }

    /// Check if leaf
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Child on the given side
    #[inline]
    pub fn child(&self, side: Side) -> &Link {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Mutable child slot on the given side
    #[inline]
    pub fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Number of nodes in this subtree
    pub fn len(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |n| n.len()) + self.right.as_ref().map_or(0, |n| n.len())
    }

    /// Smallest key in this subtree (leftmost node)
    pub fn min_value(&self) -> i64 {
        let mut current = self;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        current.value
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(h={}, bf={})", self.value, self.height, self.balance_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_children(value: i64, left: Link, right: Link) -> Box<TreeNode> {
        let mut node = TreeNode::leaf(value);
        node.left = left;
        node.right = right;
        node.refresh();
        Box::new(node)
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = TreeNode::leaf(1);
        let b = TreeNode::leaf(1);
        assert_ne!(a.id, b.id);
        assert_eq!(a.clone().id, a.id);
    }

    #[test]
    fn test_refresh_height_and_balance() {
        let left = with_children(5, Some(Box::new(TreeNode::leaf(2))), None);
        let root = with_children(10, Some(left), None);

        assert_eq!(root.height, 3);
        assert_eq!(root.balance_factor, 2);
        assert_eq!(root.left.as_ref().map(|n| n.balance_factor), Some(1));
        assert_eq!(TreeNode::height_of(None), 0);
    }

    #[test]
    fn test_len_and_min_value() {
        let root = with_children(
            20,
            Some(with_children(10, Some(Box::new(TreeNode::leaf(5))), None)),
            Some(Box::new(TreeNode::leaf(30))),
        );
        assert_eq!(root.len(), 4);
        assert_eq!(root.min_value(), 5);
        assert!(!root.is_leaf());
        assert_eq!(root.to_string(), "20(h=3, bf=1)");
    }
}
