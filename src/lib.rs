//! # Step-recording AVL tree engine
//!
//! Every insert and delete produces two things: the new tree, and an ordered
//! trail of frames that replays each micro-step of getting there.
//!
//! ## Core Algorithm
//!
//! 1. **Descent**: ordinary BST search, one frame per comparison
//! 2. **Mutation**: leaf creation, or removal / successor copy
//! 3. **Unwind**: height + balance factor refreshed bottom-up, one frame each
//! 4. **Repair**: LL / RR / LR / RL detected and fixed with rotations, every
//!    rotation framed before and after
//!
//! Each frame holds an independent, laid-out deep copy of the tree, so a
//! trail can be stored and scrubbed freely.
//!
//! ## Usage Example
//!
//! ```
//! use avl_trace::{insert, ActionType};
//!
//! let root = insert(None, 30).final_tree;
//! let root = insert(root.as_deref(), 20).final_tree;
//! let result = insert(root.as_deref(), 10);
//!
//! assert_eq!(result.final_tree.as_ref().map(|n| n.value), Some(20));
//! assert!(result.steps.iter().any(|s| s.action_type == ActionType::Rotate));
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules
pub mod tree;       // Node model and navigation
pub mod layout;     // Inorder-rank / depth coordinates
pub mod recorder;   // Frame log
pub mod engine;     // Insert / delete / rotate / rebalance
pub mod session;    // History, undo, playback cursor
pub mod render;     // Text output

// Re-exports for convenience
pub use engine::{rotate_left, rotate_right, Imbalance, OperationResult, Simulator};
pub use layout::{calculate_layout, calculate_layout_with, LayoutConfig};
pub use recorder::{ActionType, AnimationStep, StepRecorder};
pub use session::{
    ComparisonView, HistoryEntry, Operation, Playback, PlaybackState, Session, SessionConfig,
};
pub use tree::{Link, NodeId, Side, TreeNode};

use thiserror::Error;

/// Insert `value` into a copy of `root`
///
/// The caller's tree is never modified; keep `final_tree` as the next root.
pub fn insert(root: Option<&TreeNode>, value: i64) -> OperationResult {
    Simulator::new(root).insert(value)
}

/// Delete `value` from a copy of `root`
pub fn delete(root: Option<&TreeNode>, value: i64) -> OperationResult {
    Simulator::new(root).delete(value)
}

/// Errors raised around the engine (the engine itself cannot fail)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// History is empty
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Unknown operation verb
    #[error("Invalid operation: {0} (expected i<key>, d<key>, insert:<key> or delete:<key>)")]
    InvalidOperation(String),

    /// Key is not an integer
    #[error("Invalid key {0:?}: keys must be integers")]
    InvalidValue(String),

    /// Cursor target past the end of the trail
    #[error("Step {index} out of range for trail of {len} frames")]
    StepOutOfRange {
        /// Requested frame
        index: usize,
        /// Frames available
        len: usize,
    },
}
