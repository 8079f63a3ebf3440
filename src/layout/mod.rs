//! Layout calculator
//!
//! Two independent passes over a deep clone:
//!   x = (rank + 1) / (n + 1) · 100   where rank = inorder position
//!   y = base_offset + depth · vertical_spacing
//!
//! Inorder rank gives strictly increasing, unique x values with equal margins
//! on both ends, whatever the tree's shape. Ranks and depths shift after any
//! structural change, so layout is recomputed from scratch every time.

use crate::tree::{Link, TreeNode};

/// Vertical placement parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// y of the root
    pub base_offset: f64,

    /// y distance between consecutive depths
    pub vertical_spacing: f64,
}

impl LayoutConfig {
    /// Create a layout configuration
    pub fn new(base_offset: f64, vertical_spacing: f64) -> Self {
        Self {
            base_offset,
            vertical_spacing,
        }
    }

    /// y coordinate for a depth (root = 0)
    #[inline]
    pub fn y_for_depth(&self, depth: usize) -> f64 {
        self.base_offset + depth as f64 * self.vertical_spacing
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(8.0, 12.0)
    }
}

/// Lay out a tree with the default configuration
///
/// Never mutates the input; the result shares no structure with it.
pub fn calculate_layout(root: Option<&TreeNode>) -> Link {
    calculate_layout_with(root, &LayoutConfig::default())
}

/// Lay out a tree with an explicit configuration
pub fn calculate_layout_with(root: Option<&TreeNode>, config: &LayoutConfig) -> Link {
    let mut clone = Box::new(root?.clone());

    let count = clone.len();
    let mut rank = 0;
    assign_ranks(&mut clone, count, &mut rank);
    assign_depths(&mut clone, 0, config);

    Some(clone)
}

fn assign_ranks(node: &mut TreeNode, count: usize, rank: &mut usize) {
    if let Some(left) = node.left.as_deref_mut() {
        assign_ranks(left, count, rank);
    }

    node.x = (*rank + 1) as f64 / (count + 1) as f64 * 100.0;
    *rank += 1;

    if let Some(right) = node.right.as_deref_mut() {
        assign_ranks(right, count, rank);
    }
}

fn assign_depths(node: &mut TreeNode, depth: usize, config: &LayoutConfig) {
    node.y = config.y_for_depth(depth);
    if let Some(left) = node.left.as_deref_mut() {
        assign_depths(left, depth + 1, config);
    }
    if let Some(right) = node.right.as_deref_mut() {
        assign_depths(right, depth + 1, config);
    }
}
