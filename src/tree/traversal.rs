//! Top-down navigation and read-only walks
//!
//! The engine never holds a borrow into the tree across a snapshot.
//! Instead it keeps a path of `Side` tokens from the root and re-resolves
//! the slot it needs each time. A path is O(height) = O(log n) tokens.

use super::{Link, TreeNode};

/// Which child a path step descends into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left child (smaller keys)
    Left,

    /// Right child (larger keys)
    Right,
}

impl Side {
    /// The other side
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Resolve the slot at the end of `path`
///
/// Returns `None` if the path runs through an empty subtree.
pub fn slot<'a>(root: &'a Link, path: &[Side]) -> Option<&'a Link> {
    let mut slot = root;
    for &side in path {
        slot = slot.as_ref()?.child(side);
    }
    Some(slot)
}

/// Mutable counterpart of [`slot`]
pub fn slot_mut<'a>(root: &'a mut Link, path: &[Side]) -> Option<&'a mut Link> {
    let mut slot = root;
    for &side in path {
        slot = slot.as_mut()?.child_mut(side);
    }
    Some(slot)
}

/// Read-only BST search
pub fn find(root: Option<&TreeNode>, value: i64) -> Option<&TreeNode> {
    let mut current = root;
    while let Some(node) = current {
        if value == node.value {
            return Some(node);
        }
        current = if value < node.value {
            node.left.as_deref()
        } else {
            node.right.as_deref()
        };
    }
    None
}

/// Membership test
#[inline]
pub fn contains(root: Option<&TreeNode>, value: i64) -> bool {
    find(root, value).is_some()
}

/// Locate a node by identity (full walk, not a key search)
pub fn find_by_id(root: Option<&TreeNode>, id: super::NodeId) -> Option<&TreeNode> {
    let node = root?;
    if node.id == id {
        return Some(node);
    }
    find_by_id(node.left.as_deref(), id).or_else(|| find_by_id(node.right.as_deref(), id))
}

/// Nodes in inorder (ascending key order for a valid BST)
pub fn inorder(root: Option<&TreeNode>) -> Vec<&TreeNode> {
    fn walk<'a>(node: Option<&'a TreeNode>, out: &mut Vec<&'a TreeNode>) {
        if let Some(node) = node {
            walk(node.left.as_deref(), out);
            out.push(node);
            walk(node.right.as_deref(), out);
        }
    }

    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

/// Keys in inorder
pub fn inorder_values(root: Option<&TreeNode>) -> Vec<i64> {
    inorder(root).into_iter().map(|n| n.value).collect()
}

/// Nodes paired with their depth (root = 0), preorder
pub fn with_depths(root: Option<&TreeNode>) -> Vec<(&TreeNode, usize)> {
    fn walk<'a>(node: Option<&'a TreeNode>, depth: usize, out: &mut Vec<(&'a TreeNode, usize)>) {
        if let Some(node) = node {
            out.push((node, depth));
            walk(node.left.as_deref(), depth + 1, out);
            walk(node.right.as_deref(), depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out
}

/// Check the AVL invariant against recomputed heights
///
/// Verifies at every node that stored height and balance factor match the
/// children and that |bf| ≤ 1.
pub fn is_avl(root: Option<&TreeNode>) -> bool {
    fn checked_height(node: Option<&TreeNode>) -> Option<u32> {
        let Some(node) = node else {
            return Some(0);
        };
        let left = checked_height(node.left.as_deref())?;
        let right = checked_height(node.right.as_deref())?;
        let balance = left as i32 - right as i32;
        let height = 1 + left.max(right);
        (balance.abs() <= 1 && node.height == height && node.balance_factor == balance)
            .then_some(height)
    }

    checked_height(root).is_some()
}

/// Check strict ascending inorder
pub fn is_ordered(root: Option<&TreeNode>) -> bool {
    inorder_values(root).windows(2).all(|w| w[0] < w[1])
}

/// Structural fingerprint of a tree
///
/// Covers shape, keys, heights and balance factors. Ids and coordinates are
/// excluded: two structurally identical trees hash the same.
pub fn fingerprint(root: Option<&TreeNode>) -> blake3::Hash {
    fn feed(node: Option<&TreeNode>, hasher: &mut blake3::Hasher) {
        match node {
            None => {
                hasher.update(&[0]);
            }
            Some(node) => {
                hasher.update(&[1]);
                hasher.update(&node.value.to_le_bytes());
                hasher.update(&node.height.to_le_bytes());
                hasher.update(&node.balance_factor.to_le_bytes());
                feed(node.left.as_deref(), hasher);
                feed(node.right.as_deref(), hasher);
            }
        }
    }

    let mut hasher = blake3::Hasher::new();
    feed(root, &mut hasher);
    hasher.finalize()
}
