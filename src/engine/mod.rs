//! Mutation engine
//!
//! One `Simulator` runs exactly one insert or delete:
//! 1. Pin the base tree and announce the operation
//! 2. BST descent, one frame per comparison
//! 3. Leaf creation / removal at the bottom
//! 4. On the unwind: refresh height + balance, report, repair imbalances
//! 5. Announce completion and hand back `{ final_tree, steps }`
//!
//! The descent keeps a path of `Side` tokens instead of borrows, so every
//! frame can snapshot the whole live tree with all links in place.

mod rebalance;
mod rotation;

pub use rebalance::Imbalance;
pub use rotation::{rotate_left, rotate_right};

use std::cmp::Ordering;

use crate::layout::LayoutConfig;
use crate::recorder::{ActionType, AnimationStep, StepRecorder};
use crate::tree::{clone_tree, traversal, Link, NodeId, Side, TreeNode};

/// Final tree plus the frame trail that produced it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "visualize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct OperationResult {
    /// New logical root (coordinates not laid out)
    pub final_tree: Link,

    /// Ordered frames, opening announcement first
    pub steps: Vec<AnimationStep>,
}

/// Single-use engine for one insert or delete
///
/// Seeded with a deep copy of the caller's root; consumed by the operation,
/// so no working state outlives the call.
#[derive(Debug)]
pub struct Simulator {
    root: Link,
    recorder: StepRecorder,
}

impl Simulator {
    /// Create an engine over a copy of `root`
    pub fn new(root: Option<&TreeNode>) -> Self {
        Self::with_layout(root, LayoutConfig::default())
    }

    /// Create an engine whose frames use a custom layout
    pub fn with_layout(root: Option<&TreeNode>, layout: LayoutConfig) -> Self {
        Self {
            root: clone_tree(root),
            recorder: StepRecorder::new(layout),
        }
    }

    /// Insert `value`
    ///
    /// A duplicate key is a no-op: the trail is the opening frame plus one
    /// informational frame and the tree comes back unchanged.
    pub fn insert(mut self, value: i64) -> OperationResult {
        tracing::debug!(value, "insert");
        self.recorder.begin(self.root.as_deref());
        self.frame(ActionType::Insert, None, format!("Starting insertion of {value}."));

        if let Some(existing) = traversal::find(self.root.as_deref(), value).map(|n| n.id) {
            self.frame(
                ActionType::Info,
                Some(existing),
                format!("Value {value} already exists. Tree unchanged."),
            );
            return self.finish();
        }

        let mut path = Vec::new();
        self.insert_at(&mut path, value);

        self.frame(
            ActionType::Info,
            None,
            format!("Insertion of {value} complete. Tree is balanced."),
        );
        self.finish()
    }

    /// Delete `value`
    ///
    /// An absent key (including on an empty tree) is a no-op with a single
    /// informational frame after the opening one.
    pub fn delete(mut self, value: i64) -> OperationResult {
        tracing::debug!(value, "delete");
        self.recorder.begin(self.root.as_deref());
        self.frame(ActionType::Delete, None, format!("Starting deletion of {value}."));

        if !traversal::contains(self.root.as_deref(), value) {
            self.frame(ActionType::Info, None, format!("Node {value} not found in the tree."));
            return self.finish();
        }

        let mut path = Vec::new();
        self.delete_at(&mut path, value);

        self.frame(ActionType::Info, None, format!("Deletion of {value} complete."));
        self.finish()
    }

    /// Returns whether the subtree at `path` changed
    fn insert_at(&mut self, path: &mut Vec<Side>, value: i64) -> bool {
        let Some((id, node_value)) = self.node(path).map(|n| (n.id, n.value)) else {
            let leaf = TreeNode::leaf(value);
            let leaf_id = leaf.id;
            if let Some(slot) = traversal::slot_mut(&mut self.root, path) {
                *slot = Some(Box::new(leaf));
            }
            self.frame(ActionType::Insert, Some(leaf_id), format!("Inserted new node {value}."));
            return true;
        };

        self.frame(ActionType::Info, Some(id), format!("Comparing {value} with {node_value}."));

        let side = match value.cmp(&node_value) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => {
                self.frame(ActionType::Info, Some(id), format!("Value {value} already exists."));
                return false;
            }
        };

        path.push(side);
        let changed = self.insert_at(path, value);
        path.pop();

        // Nothing below changed, so heights and balances above are still valid
        if !changed {
            return false;
        }

        self.refresh_and_check(path);
        if let Some(case) = self.node(path).and_then(|n| Imbalance::after_insert(n, value)) {
            self.rebalance(path, case);
        }
        true
    }

    fn delete_at(&mut self, path: &mut Vec<Side>, value: i64) {
        let Some(node) = self.node(path) else {
            return;
        };
        let (id, node_value) = (node.id, node.value);
        let children = (
            node.left.as_deref().map(|n| n.value),
            node.right.as_deref().map(|n| n.value),
        );
        let successor = node.right.as_deref().map(TreeNode::min_value);

        match value.cmp(&node_value) {
            Ordering::Less | Ordering::Greater => {
                self.frame(ActionType::Info, Some(id), format!("Comparing {value} with {node_value}."));
                let side = if value < node_value { Side::Left } else { Side::Right };
                path.push(side);
                self.delete_at(path, value);
                path.pop();
            }
            Ordering::Equal => match (children, successor) {
                ((Some(_), Some(_)), Some(successor)) => {
                    // Target keeps its id; only the key changes
                    if let Some(node) = self.node_mut(path) {
                        node.value = successor;
                    }
                    self.frame(
                        ActionType::Delete,
                        Some(id),
                        format!(
                            "Copied successor value {successor} to node {node_value}. Deleting duplicate successor from right subtree."
                        ),
                    );
                    path.push(Side::Right);
                    self.delete_at(path, successor);
                    path.pop();
                }
                ((left, right), _) => {
                    let description = match left.or(right) {
                        Some(child) => format!("Node {value} replaced by child {child}."),
                        None => format!("Leaf node {value} removed."),
                    };
                    self.frame(ActionType::Delete, Some(id), description);
                    self.splice_out(path);
                    return;
                }
            },
        }

        self.refresh_and_check(path);
        if let Some(case) = self.node(path).and_then(Imbalance::after_delete) {
            self.rebalance(path, case);
        }
    }

    /// Replace the node at `path` (at most one child) with that child
    fn splice_out(&mut self, path: &[Side]) {
        let Some(slot) = traversal::slot_mut(&mut self.root, path) else {
            return;
        };
        if let Some(mut node) = slot.take() {
            *slot = node.left.take().or_else(|| node.right.take());
        }
    }

    fn refresh_and_check(&mut self, path: &[Side]) {
        let Some(node) = self.node_mut(path) else {
            return;
        };
        node.refresh();
        let (id, value, height, balance) = (node.id, node.value, node.height, node.balance_factor);
        self.frame(
            ActionType::Check,
            Some(id),
            format!("Calculated Height: {height}, Balance Factor: {balance} for Node {value}."),
        );
    }

    fn node(&self, path: &[Side]) -> Option<&TreeNode> {
        traversal::slot(&self.root, path)?.as_deref()
    }

    fn node_mut(&mut self, path: &[Side]) -> Option<&mut TreeNode> {
        traversal::slot_mut(&mut self.root, path)?.as_deref_mut()
    }

    fn frame(&mut self, action_type: ActionType, highlight: Option<NodeId>, description: String) {
        self.recorder
            .snapshot(self.root.as_deref(), description, action_type, highlight, None);
    }

    fn finish(self) -> OperationResult {
        debug_assert!(traversal::is_avl(self.root.as_deref()), "AVL invariant violated");
        tracing::debug!(
            frames = self.recorder.len(),
            nodes = crate::tree::len(self.root.as_deref()),
            "operation finished"
        );
        OperationResult {
            final_tree: self.root,
            steps: self.recorder.into_steps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::traversal::{inorder_values, is_avl};

    fn build(values: &[i64]) -> Link {
        values
            .iter()
            .fold(None, |root: Link, &v| Simulator::new(root.as_deref()).insert(v).final_tree)
    }

    fn tags(steps: &[AnimationStep]) -> Vec<ActionType> {
        steps.iter().map(|s| s.action_type).collect()
    }

    #[test]
    fn test_insert_into_empty() {
        let result = Simulator::new(None).insert(7);
        assert_eq!(
            tags(&result.steps),
            vec![ActionType::Insert, ActionType::Insert, ActionType::Info]
        );
        let root = result.final_tree.as_deref();
        assert_eq!(root.map(|n| (n.value, n.height)), Some((7, 1)));
        // Leaf frame focuses the node that ends up in the tree
        assert_eq!(result.steps[1].highlight_node_id, root.map(|n| n.id));
        assert!(result.steps[0].tree.is_none());
    }

    #[test]
    fn test_new_leaf_visible_in_its_frame() {
        let root = build(&[20, 10]);
        let result = Simulator::new(root.as_deref()).insert(30);
        let leaf_frame = result
            .steps
            .iter()
            .find(|s| s.action_type == ActionType::Insert && s.highlight_node_id.is_some());
        let values = leaf_frame.map(|s| inorder_values(s.tree.as_deref()));
        assert_eq!(values, Some(vec![10, 20, 30]));
    }

    #[test]
    fn test_caller_tree_not_mutated() {
        let root = build(&[1, 2]);
        let before = root.clone();
        let _ = Simulator::new(root.as_deref()).insert(3);
        assert_eq!(root, before);
    }

    #[test]
    fn test_check_frames_on_unwind() {
        let root = build(&[20, 10, 30]);
        let result = Simulator::new(root.as_deref()).insert(5);
        let checks: Vec<&str> = result
            .steps
            .iter()
            .filter(|s| s.action_type == ActionType::Check)
            .map(|s| s.description.as_str())
            .collect();
        assert_eq!(
            checks,
            vec![
                "Calculated Height: 2, Balance Factor: 1 for Node 10.",
                "Calculated Height: 3, Balance Factor: 1 for Node 20.",
            ]
        );
    }

    #[test]
    fn test_rotation_frames_carry_comparison() {
        let root = build(&[30, 20]);
        let result = Simulator::new(root.as_deref()).insert(10);
        for step in result.steps.iter().filter(|s| s.is_rotation()) {
            let before = step.comparison_tree.as_deref();
            assert_eq!(before.map(|n| n.value), Some(30));
            assert_eq!(inorder_values(before), vec![10, 20, 30]);
        }
        let last_rotation = result.steps.iter().rev().find(|s| s.is_rotation());
        assert_eq!(
            last_rotation.and_then(|s| s.tree.as_deref()).map(|n| n.value),
            Some(20)
        );
    }

    #[test]
    fn test_delete_leaf_and_one_child() {
        let root = build(&[20, 10, 30, 40]);

        let result = Simulator::new(root.as_deref()).delete(30);
        assert!(result
            .steps
            .iter()
            .any(|s| s.description == "Node 30 replaced by child 40."));
        assert_eq!(inorder_values(result.final_tree.as_deref()), vec![10, 20, 40]);

        let result = Simulator::new(result.final_tree.as_deref()).delete(10);
        assert!(result.steps.iter().any(|s| s.description == "Leaf node 10 removed."));
        assert_eq!(inorder_values(result.final_tree.as_deref()), vec![20, 40]);
        assert!(is_avl(result.final_tree.as_deref()));
    }

    #[test]
    fn test_delete_rebalances() {
        // Removing 10 leaves 30 with a right-heavy chain: RR at the root
        let root = build(&[20, 10, 30, 40]);
        let result = Simulator::new(root.as_deref()).delete(10);

        let root = result.final_tree.as_deref();
        assert_eq!(root.map(|n| n.value), Some(30));
        assert!(is_avl(root));
        assert!(result
            .steps
            .iter()
            .any(|s| s.action_type == ActionType::Imbalance && s.description.contains("Right-Right")));
    }

    #[test]
    fn test_delete_last_node() {
        let root = build(&[1]);
        let result = Simulator::new(root.as_deref()).delete(1);
        assert!(result.final_tree.is_none());
        assert_eq!(
            tags(&result.steps),
            vec![ActionType::Delete, ActionType::Delete, ActionType::Info]
        );
    }

    #[test]
    fn test_base_tree_constant() {
        let root = build(&[30, 20]);
        let result = Simulator::new(root.as_deref()).insert(10);
        for step in &result.steps {
            assert_eq!(inorder_values(step.base_tree.as_deref()), vec![20, 30]);
        }
    }
}
