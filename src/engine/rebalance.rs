//! Imbalance detection and repair dispatch
//!
//! Four cases, named by the path from the unbalanced node to its heavy
//! grandchild. Insert decides the case from the inserted key; delete has
//! no key to compare and reads the heavy child's balance factor instead.

use std::fmt;

use super::Simulator;
use crate::recorder::ActionType;
use crate::tree::{Side, TreeNode};

/// Which AVL repair an unbalanced node needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Imbalance {
    /// Left child's left subtree too tall: single right rotation
    LeftLeft,
    /// Right child's right subtree too tall: single left rotation
    RightRight,
    /// Left child's right subtree too tall: left then right rotation
    LeftRight,
    /// Right child's left subtree too tall: right then left rotation
    RightLeft,
}

impl Imbalance {
    /// Classify a node on the unwind of an insert of `value`
    ///
    /// Priority LL, RR, LR, RL; first match wins.
    pub fn after_insert(node: &TreeNode, value: i64) -> Option<Self> {
        let balance = node.balance_factor;
        let left = node.left.as_deref().map(|n| n.value);
        let right = node.right.as_deref().map(|n| n.value);

        if balance > 1 && left.is_some_and(|l| value < l) {
            Some(Imbalance::LeftLeft)
        } else if balance < -1 && right.is_some_and(|r| value > r) {
            Some(Imbalance::RightRight)
        } else if balance > 1 && left.is_some_and(|l| value > l) {
            Some(Imbalance::LeftRight)
        } else if balance < -1 && right.is_some_and(|r| value < r) {
            Some(Imbalance::RightLeft)
        } else {
            None
        }
    }

    /// Classify a node on the unwind of a delete
    pub fn after_delete(node: &TreeNode) -> Option<Self> {
        let balance = node.balance_factor;

        if balance > 1 {
            if TreeNode::balance_of(node.left.as_deref()) >= 0 {
                Some(Imbalance::LeftLeft)
            } else {
                Some(Imbalance::LeftRight)
            }
        } else if balance < -1 {
            if TreeNode::balance_of(node.right.as_deref()) <= 0 {
                Some(Imbalance::RightRight)
            } else {
                Some(Imbalance::RightLeft)
            }
        } else {
            None
        }
    }

    /// Short case name
    pub fn label(&self) -> &'static str {
        match self {
            Imbalance::LeftLeft => "Left-Left",
            Imbalance::RightRight => "Right-Right",
            Imbalance::LeftRight => "Left-Right",
            Imbalance::RightLeft => "Right-Left",
        }
    }

    /// Whether the repair takes two rotations
    pub fn is_double(&self) -> bool {
        matches!(self, Imbalance::LeftRight | Imbalance::RightLeft)
    }

    /// Side of the heavy child
    pub fn heavy_side(&self) -> Side {
        match self {
            Imbalance::LeftLeft | Imbalance::LeftRight => Side::Left,
            Imbalance::RightRight | Imbalance::RightLeft => Side::Right,
        }
    }
}

impl fmt::Display for Imbalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Simulator {
    /// Announce the case, then apply the rotation(s) at `path`
    pub(super) fn rebalance(&mut self, path: &mut Vec<Side>, case: Imbalance) {
        let Some(node) = self.node(path) else {
            return;
        };
        let (id, value, balance) = (node.id, node.value, node.balance_factor);
        let heavy = case.heavy_side();
        let child_value = node.child(heavy).as_deref().map_or(value, |c| c.value);

        let plan = match case {
            Imbalance::LeftLeft => "Needs Right Rotation.".to_string(),
            Imbalance::RightRight => "Needs Left Rotation.".to_string(),
            Imbalance::LeftRight => format!(
                "Left Rotate on left child {child_value}, then Right Rotate on {value}."
            ),
            Imbalance::RightLeft => format!(
                "Right Rotate on right child {child_value}, then Left Rotate on {value}."
            ),
        };
        self.frame(
            ActionType::Imbalance,
            Some(id),
            format!("Imbalance detected at Node {value} (BF: {balance}). {case} Case. {plan}"),
        );
        tracing::debug!(node = value, balance, case = %case, "rebalancing");

        if case.is_double() {
            // Straighten the heavy child first so the outer rotation sees a
            // single-rotation case.
            path.push(heavy);
            self.rotate(path, heavy.opposite());
            path.pop();

            let short = match case {
                Imbalance::LeftRight => "LR",
                _ => "RL",
            };
            let outer = match heavy {
                Side::Left => "Right",
                Side::Right => "Left",
            };
            self.frame(
                ActionType::Balance,
                Some(id),
                format!("Step 2 of {short}: child relinked under {value}. Now {outer} Rotate on pivot {value}."),
            );
        }

        self.rotate(path, heavy);
    }
}
