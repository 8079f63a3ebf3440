//! Interactive session: logical root, history, and playback
//!
//! Owns everything the engine deliberately does not: the root carried from
//! one operation to the next, the concatenated frame trail, an undo stack of
//! prior roots, and the playback cursor.

mod operation;
mod playback;

pub use operation::Operation;
pub use playback::{Playback, PlaybackState};

use std::ops::Range;
use std::time::Duration;

use crate::engine::{OperationResult, Simulator};
use crate::layout::{calculate_layout_with, LayoutConfig};
use crate::recorder::AnimationStep;
use crate::tree::{Link, TreeNode};
use crate::SessionError;

/// Session parameters
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Layout used for every frame and view
    pub layout: LayoutConfig,

    /// Milliseconds between frames while playing
    pub playback_interval_ms: u64,

    /// Start playing after each operation
    pub autoplay: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            playback_interval_ms: 800,
            autoplay: true,
        }
    }
}

/// One completed operation on the undo stack
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "visualize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct HistoryEntry {
    /// Logical root before the operation
    pub tree: Link,

    /// Operation label, e.g. `Insert 30`
    pub label: String,

    /// Trail length when the operation started
    pub step_index_at_start: usize,
}

/// A tree shown next to the current frame, with its caption
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    /// Caption
    pub label: String,

    /// Laid-out tree
    pub tree: Link,
}

/// Stateful driver around the engine
#[derive(Debug)]
pub struct Session {
    root: Link,
    history: Vec<HistoryEntry>,
    playback: Playback,
    config: SessionConfig,
}

impl Session {
    /// Create an empty session
    pub fn new(config: SessionConfig) -> Self {
        Self {
            root: None,
            history: Vec::new(),
            playback: Playback::new(Duration::from_millis(config.playback_interval_ms)),
            config,
        }
    }

    /// Current logical root
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Insert a key; returns the range of new frames
    pub fn insert(&mut self, value: i64) -> Range<usize> {
        self.apply(Operation::Insert(value))
    }

    /// Delete a key; returns the range of new frames
    pub fn delete(&mut self, value: i64) -> Range<usize> {
        self.apply(Operation::Delete(value))
    }

    /// Run one operation through a fresh engine and commit it
    pub fn apply(&mut self, operation: Operation) -> Range<usize> {
        let simulator = Simulator::with_layout(self.root.as_deref(), self.config.layout);
        let result = match operation {
            Operation::Insert(value) => simulator.insert(value),
            Operation::Delete(value) => simulator.delete(value),
        };
        self.commit(operation.label(), result)
    }

    fn commit(&mut self, label: String, result: OperationResult) -> Range<usize> {
        let OperationResult { final_tree, steps } = result;
        let count = steps.len();

        let prior = std::mem::replace(&mut self.root, final_tree);
        let start = self.playback.append(steps);
        tracing::info!(operation = %label, frames = count, "operation committed");
        self.history.push(HistoryEntry {
            tree: prior,
            label,
            step_index_at_start: start,
        });

        // Cursor lands on the opening frame of the new operation
        if self.playback.seek(start).is_ok() && self.config.autoplay {
            self.playback.play();
        }

        start..start + count
    }

    /// Undo the last whole operation
    ///
    /// Restores its prior root, drops its frames, and parks the cursor on the
    /// frame before them.
    pub fn undo(&mut self) -> Result<HistoryEntry, SessionError> {
        let entry = self.history.pop().ok_or(SessionError::NothingToUndo)?;

        self.root = entry.tree.clone();
        self.playback.truncate(entry.step_index_at_start);
        self.playback.pause();
        match entry.step_index_at_start.checked_sub(1) {
            Some(previous) => self.playback.seek(previous)?,
            None => self.playback.rewind(),
        }

        tracing::info!(operation = %entry.label, "undone");
        Ok(entry)
    }

    /// Completed operations, oldest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Every frame of every operation still on the history
    pub fn steps(&self) -> &[AnimationStep] {
        self.playback.frames()
    }

    /// Playback cursor
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Mutable playback cursor
    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    /// Frame under the cursor
    pub fn current_step(&self) -> Option<&AnimationStep> {
        self.playback.current()
    }

    /// Tree to draw: the current frame's, or the laid-out root when the
    /// cursor is before the first frame
    pub fn display_tree(&self) -> Link {
        match self.current_step() {
            Some(step) => step.tree.clone(),
            None => calculate_layout_with(self.root.as_deref(), &self.config.layout),
        }
    }

    /// Tree to draw beside the current frame
    ///
    /// `offset == 0` shows the current frame's pre-rotation tree, falling back
    /// to the state before the operation. `offset == n` shows the root as it
    /// was before the n-th most recent operation.
    pub fn comparison_view(&self, offset: usize) -> Option<ComparisonView> {
        if offset == 0 {
            let step = self.current_step()?;
            return Some(match &step.comparison_tree {
                Some(tree) => ComparisonView {
                    label: "Pre-Rotation".to_string(),
                    tree: Some(tree.clone()),
                },
                None => ComparisonView {
                    label: "Initial State".to_string(),
                    tree: step.base_tree.clone(),
                },
            });
        }

        let index = self.history.len().checked_sub(offset)?;
        let entry = &self.history[index];
        Some(ComparisonView {
            label: entry.label.clone(),
            tree: calculate_layout_with(entry.tree.as_deref(), &self.config.layout),
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::traversal::inorder_values;

    #[test]
    fn test_operations_accumulate() {
        let mut session = Session::default();
        let first = session.insert(10);
        let second = session.insert(20);

        assert_eq!(first.start, 0);
        assert_eq!(second.start, first.end);
        assert_eq!(session.steps().len(), second.end);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[1].label, "Insert 20");
        assert_eq!(inorder_values(session.root()), vec![10, 20]);
        assert_eq!(session.playback().position(), Some(second.start));
        assert!(session.playback().is_playing());
    }

    #[test]
    fn test_undo_restores_root_and_trail() {
        let mut session = Session::default();
        let first = session.insert(10);
        session.insert(20);

        let undone = session.undo().ok();
        assert_eq!(undone.map(|e| e.label), Some("Insert 20".to_string()));
        assert_eq!(inorder_values(session.root()), vec![10]);
        assert_eq!(session.steps().len(), first.end);
        assert_eq!(session.playback().position(), Some(first.end - 1));
        assert!(!session.playback().is_playing());

        assert!(session.undo().is_ok());
        assert!(session.root().is_none());
        assert_eq!(session.playback().position(), None);
        assert!(matches!(session.undo(), Err(SessionError::NothingToUndo)));
    }

    #[test]
    fn test_display_tree_before_first_frame() {
        let mut session = Session::default();
        session.insert(5);
        session.playback_mut().rewind();
        let shown = session.display_tree();
        assert_eq!(shown.as_deref().map(|n| n.x), Some(50.0));
    }

    #[test]
    fn test_comparison_views() {
        let mut session = Session::default();
        session.insert(30);
        session.insert(20);
        let range = session.insert(10);

        // Opening frame of the rotation-bearing operation: base tree view
        let view = session.comparison_view(0);
        assert_eq!(view.as_ref().map(|v| v.label.as_str()), Some("Initial State"));
        assert_eq!(
            view.and_then(|v| v.tree).map(|t| t.value),
            Some(30)
        );

        let rotation = session.steps()[range]
            .iter()
            .position(|s| s.is_rotation())
            .map(|p| p + session.history()[2].step_index_at_start);
        if let Some(index) = rotation {
            session.playback_mut().seek(index).ok();
        }
        let view = session.comparison_view(0);
        assert_eq!(view.map(|v| v.label), Some("Pre-Rotation".to_string()));

        let view = session.comparison_view(2);
        assert_eq!(view.as_ref().map(|v| v.label.as_str()), Some("Insert 20"));
        assert_eq!(
            view.and_then(|v| v.tree).map(|t| inorder_values(Some(&*t))),
            Some(vec![30])
        );
        assert!(session.comparison_view(4).is_none());
    }

    #[test]
    fn test_noop_operations_still_recorded() {
        let mut session = Session::new(SessionConfig {
            autoplay: false,
            ..SessionConfig::default()
        });
        session.insert(1);
        let range = session.delete(99);
        assert_eq!(range.len(), 2);
        assert_eq!(session.history().len(), 2);
        assert_eq!(inorder_values(session.root()), vec![1]);
        assert!(!session.playback().is_playing());
    }

    #[test]
    fn test_commit_parks_cursor_without_autoplay() {
        let mut session = Session::new(SessionConfig {
            autoplay: false,
            ..SessionConfig::default()
        });
        session.insert(4);
        let range = session.insert(8);

        assert_eq!(session.playback().position(), Some(range.start));
        assert_eq!(session.playback().state(), PlaybackState::Paused);
        assert_eq!(
            session.current_step().map(|s| s.action_type),
            Some(crate::recorder::ActionType::Insert)
        );
    }
}
