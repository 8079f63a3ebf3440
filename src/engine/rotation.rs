//! Rotation primitives
//!
//! Right rotation on y (x = y.left, T2 = x.right):
//!
//! ```text
//!         y              x
//!        / \            / \
//!       x   C   ==>    A   y
//!      / \                / \
//!     A   T2            T2   C
//! ```
//!
//! Left rotation is the mirror image. The lower node is refreshed before the
//! new top, since the top's height reads the lower node's.

use super::Simulator;
use crate::recorder::ActionType;
use crate::tree::{traversal, NodeId, Side, TreeNode};

/// Rotate right around `y`; returns the new subtree root
///
/// A node without a left child is returned unchanged.
pub fn rotate_right(y: Box<TreeNode>) -> Box<TreeNode> {
    lift(y, Side::Left)
}

/// Rotate left around `x`; returns the new subtree root
///
/// A node without a right child is returned unchanged.
pub fn rotate_left(x: Box<TreeNode>) -> Box<TreeNode> {
    lift(x, Side::Right)
}

/// Lift the child on `side` above `pivot`
fn lift(mut pivot: Box<TreeNode>, side: Side) -> Box<TreeNode> {
    let Some(mut child) = pivot.child_mut(side).take() else {
        return pivot;
    };

    *pivot.child_mut(side) = child.child_mut(side.opposite()).take();
    pivot.refresh();

    *child.child_mut(side.opposite()) = Some(pivot);
    child.refresh();

    child
}

fn direction(side: Side) -> &'static str {
    match side {
        Side::Left => "Right",
        Side::Right => "Left",
    }
}

impl Simulator {
    /// Rotate the subtree at `path`, lifting its child on `side`
    ///
    /// Emits a start and a completion frame, both carrying the whole tree as
    /// it stood before the rotation.
    pub(super) fn rotate(&mut self, path: &[Side], side: Side) {
        let Some((pivot_id, pivot_value, child_value)) = self.node(path).and_then(|pivot| {
            pivot
                .child(side)
                .as_deref()
                .map(|child| (pivot.id, pivot.value, child.value))
        }) else {
            return;
        };

        let before = self.root.clone();
        let name = direction(side);

        self.rotation_frame(
            before.as_deref(),
            pivot_id,
            format!("Performing {name} Rotation on Node {pivot_value}. Node {child_value} will move up."),
        );

        let Some(slot) = traversal::slot_mut(&mut self.root, path) else {
            return;
        };
        let Some(pivot) = slot.take() else {
            return;
        };
        let top = lift(pivot, side);
        let top_id = top.id;
        *slot = Some(top);

        tracing::debug!(pivot = pivot_value, lifted = child_value, "{} rotation", name);

        self.rotation_frame(
            before.as_deref(),
            top_id,
            format!("{name} Rotation complete. {child_value} is now the parent of {pivot_value}."),
        );
    }

    fn rotation_frame(&mut self, before: Option<&TreeNode>, highlight: NodeId, description: String) {
        self.recorder.snapshot(
            self.root.as_deref(),
            description,
            ActionType::Rotate,
            Some(highlight),
            before,
        );
    }
}
