//! AVL tree data model
//!
//! Owned `Box` children, no parent links. Structural edits go through
//! paths of `Side` tokens resolved from the root (see `traversal`).

mod node;
pub mod traversal;

pub use node::{Link, NodeId, TreeNode};
pub use traversal::Side;

/// Number of nodes in an optional tree
pub fn len(root: Option<&TreeNode>) -> usize {
    root.map_or(0, TreeNode::len)
}

/// Height of an optional tree
pub fn height(root: Option<&TreeNode>) -> u32 {
    TreeNode::height_of(root)
}

/// Deep copy of an optional tree, ids preserved
pub fn clone_tree(root: Option<&TreeNode>) -> Link {
    root.map(|node| Box::new(node.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_tree_is_independent() {
        let mut original = TreeNode::leaf(7);
        original.left = Some(Box::new(TreeNode::leaf(3)));
        original.refresh();

        let copy = clone_tree(Some(&original));
        original.value = 8;
        if let Some(left) = original.left.as_deref_mut() {
            left.value = 4;
        }

        let copy = copy.as_deref();
        assert_eq!(copy.map(|n| n.value), Some(7));
        assert_eq!(copy.and_then(|n| n.left.as_deref()).map(|n| n.value), Some(3));
        assert_eq!(copy.map(|n| n.id), Some(original.id));
        assert_eq!(len(copy), 2);
        assert_eq!(height(copy), 2);
        assert_eq!(len(None), 0);
    }
}
