//! Step recorder
//!
//! Append-only log of frames for the operation in progress. Every frame
//! freezes a laid-out deep copy of the live tree, so later mutation of the
//! live tree can never reach back into a recorded frame.

use std::fmt;

use crate::layout::{calculate_layout_with, LayoutConfig};
use crate::tree::{clone_tree, traversal, Link, NodeId, TreeNode};

/// Semantic classification of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "visualize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ActionType {
    /// Operation start for insert, or a new leaf
    Insert,
    /// Operation start for delete, or a removal / value copy
    Delete,
    /// Intermediate relink between the two halves of a double rotation
    Balance,
    /// Rotation start or completion
    Rotate,
    /// Narration: comparisons, no-ops, completion
    Info,
    /// Height and balance factor recomputed
    Check,
    /// Imbalance case detected
    Imbalance,
}

impl ActionType {
    /// Every tag, in declaration order
    pub const ALL: [ActionType; 7] = [
        ActionType::Insert,
        ActionType::Delete,
        ActionType::Balance,
        ActionType::Rotate,
        ActionType::Info,
        ActionType::Check,
        ActionType::Imbalance,
    ];

    /// Lowercase tag name
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Insert => "insert",
            ActionType::Delete => "delete",
            ActionType::Balance => "balance",
            ActionType::Rotate => "rotate",
            ActionType::Info => "info",
            ActionType::Check => "check",
            ActionType::Imbalance => "imbalance",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable frame of an operation's trail
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "visualize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AnimationStep {
    /// Laid-out copy of the whole tree at this instant
    pub tree: Link,

    /// Laid-out copy of the tree just before the rotation this frame belongs to
    pub comparison_tree: Link,

    /// Laid-out copy of the tree before the operation began
    pub base_tree: Link,

    /// Narration
    pub description: String,

    /// Node to focus on
    pub highlight_node_id: Option<NodeId>,

    /// Frame tag
    pub action_type: ActionType,
}

impl AnimationStep {
    /// Whether this frame belongs to a rotation
    pub fn is_rotation(&self) -> bool {
        self.action_type == ActionType::Rotate
    }

    /// The highlighted node as it appears in this frame's tree
    pub fn highlighted(&self) -> Option<&TreeNode> {
        traversal::find_by_id(self.tree.as_deref(), self.highlight_node_id?)
    }
}

/// Accumulates frames for one operation
#[derive(Debug)]
pub struct StepRecorder {
    steps: Vec<AnimationStep>,
    base_tree: Link,
    layout: LayoutConfig,
}

impl StepRecorder {
    /// Create an empty recorder
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            steps: Vec::new(),
            base_tree: None,
            layout,
        }
    }

    /// Reset for a new operation and pin its base tree
    pub fn begin(&mut self, root: Option<&TreeNode>) {
        self.steps.clear();
        self.base_tree = clone_tree(root);
    }

    /// Append a frame
    ///
    /// `current` and the pinned base tree are laid out afresh. A comparison
    /// tree is laid out and attached to this frame only.
    pub fn snapshot(
        &mut self,
        current: Option<&TreeNode>,
        description: impl Into<String>,
        action_type: ActionType,
        highlight_node_id: Option<NodeId>,
        comparison_tree: Option<&TreeNode>,
    ) {
        let step = AnimationStep {
            tree: calculate_layout_with(current, &self.layout),
            comparison_tree: calculate_layout_with(comparison_tree, &self.layout),
            base_tree: calculate_layout_with(self.base_tree.as_deref(), &self.layout),
            description: description.into(),
            highlight_node_id,
            action_type,
        };
        tracing::trace!(
            index = self.steps.len(),
            action = %step.action_type,
            "{}",
            step.description
        );
        self.steps.push(step);
    }

    /// Frames recorded so far
    pub fn steps(&self) -> &[AnimationStep] {
        &self.steps
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True before the first frame
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Hand the trail over
    pub fn into_steps(self) -> Vec<AnimationStep> {
        self.steps
    }
}
